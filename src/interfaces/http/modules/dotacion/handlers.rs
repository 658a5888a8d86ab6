//! Dotación (PPE) API handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::application::services::StockView;
use crate::domain::dotacion::EntregaGroup;
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/dotacion/stock",
    tag = "Dotacion",
    params(SearchParams),
    responses(
        (status = 200, description = "Stock matching `tipo` or `talla`, totals over all stock", body = ApiResponse<StockView>),
        (status = 403, description = "No access to Dotación")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_stock(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<StockView> {
    let stock = state.dotacion.stock(&params.search).await;
    Ok(Json(ApiResponse::success(stock)))
}

#[utoipa::path(
    get,
    path = "/api/v1/dotacion/entregas",
    tag = "Dotacion",
    params(SearchParams),
    responses(
        (status = 200, description = "Issuances grouped by recipient, newest first", body = ApiResponse<Vec<EntregaGroup>>),
        (status = 403, description = "No access to Dotación")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_entregas(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<EntregaGroup>> {
    let groups = state.dotacion.entregas(&params.search).await;
    Ok(Json(ApiResponse::success(groups)))
}
