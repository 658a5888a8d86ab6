//! Jornadas API handlers

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

use super::dto::JornadaParams;
use crate::domain::jornada::JornadaListing;
use crate::domain::period;
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

const EXPORT_FILE_NAME: &str = "jornadas.csv";

#[utoipa::path(
    get,
    path = "/api/v1/jornadas",
    tag = "Jornadas",
    params(JornadaParams),
    responses(
        (status = 200, description = "Filtered records with totals and filter options", body = ApiResponse<JornadaListing>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_jornadas(
    State(state): State<AppState>,
    Query(params): Query<JornadaParams>,
) -> ApiResult<JornadaListing> {
    let listing = state.jornadas.listing(params.into(), period::today()).await;
    Ok(Json(ApiResponse::success(listing)))
}

/// CSV of the listing as currently filtered
#[utoipa::path(
    get,
    path = "/api/v1/jornadas/export.csv",
    tag = "Jornadas",
    params(JornadaParams),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Reports are not available to this role")
    ),
    security(("bearer_auth" = []))
)]
pub async fn export_jornadas(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<JornadaParams>,
) -> impl IntoResponse {
    let csv = state.jornadas.export_csv(params.into(), period::today()).await;
    info!(uid = %user.uid, bytes = csv.len(), "Jornadas exported");
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    )
}
