//! Sedes API handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use tracing::info;

use super::dto::{SedeParams, UpdateRatesRequest};
use crate::domain::sede::Sede;
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/sedes",
    tag = "Sedes",
    params(SedeParams),
    responses(
        (status = 200, description = "Matching sedes", body = ApiResponse<Vec<Sede>>),
        (status = 403, description = "No access to Sedes")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_sedes(
    State(state): State<AppState>,
    Query(params): Query<SedeParams>,
) -> ApiResult<Vec<Sede>> {
    Ok(Json(ApiResponse::success(
        state.sedes.list(&params.search).await,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/sedes/{id}",
    tag = "Sedes",
    params(("id" = String, Path, description = "Sede document id")),
    responses(
        (status = 200, description = "Sede with its cost centers", body = ApiResponse<Sede>),
        (status = 404, description = "Sede not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_sede(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Sede> {
    let sede = state.sedes.get(&id).await?;
    Ok(Json(ApiResponse::success(sede)))
}

#[utoipa::path(
    put,
    path = "/api/v1/sedes/{id}/rates",
    tag = "Sedes",
    params(("id" = String, Path, description = "Sede document id")),
    request_body = UpdateRatesRequest,
    responses(
        (status = 200, description = "Sede as saved", body = ApiResponse<Sede>),
        (status = 400, description = "Unknown cost center or invalid rate"),
        (status = 404, description = "Sede not found"),
        (status = 502, description = "Backend write failed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_rates(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRatesRequest>,
) -> ApiResult<Sede> {
    let sede = state.sedes.save_rates(&id, &request.edits).await?;
    info!(sede = %id, uid = %user.uid, edits = request.edits.len(), "Rates updated");
    Ok(Json(ApiResponse::success(sede)))
}
