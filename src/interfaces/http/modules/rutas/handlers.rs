//! Rutas API handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ruta::{RutaQuery, RutaView};
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RutaParams {
    /// Substring of the route name, driver or vehicle
    #[serde(default)]
    pub search: String,
    pub status: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/rutas",
    tag = "Rutas",
    params(RutaParams),
    responses(
        (status = 200, description = "Routes with per-status summary", body = ApiResponse<RutaView>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_rutas(
    State(state): State<AppState>,
    Query(params): Query<RutaParams>,
) -> ApiResult<RutaView> {
    let query = RutaQuery {
        search: params.search,
        status: params.status.filter(|s| !s.is_empty()),
    };
    Ok(Json(ApiResponse::success(state.rutas.view(&query).await)))
}
