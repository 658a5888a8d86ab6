//! Inventario API handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::inventario::{InventoryQuery, InventoryView};
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InventoryParams {
    /// Substring of the item name or SKU
    #[serde(default)]
    pub search: String,
    pub category: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/inventario",
    tag = "Inventario",
    params(InventoryParams),
    responses(
        (status = 200, description = "Items with stock status and summary", body = ApiResponse<InventoryView>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_inventario(
    State(state): State<AppState>,
    Query(params): Query<InventoryParams>,
) -> ApiResult<InventoryView> {
    let query = InventoryQuery {
        search: params.search,
        category: params.category.filter(|c| !c.is_empty()),
    };
    Ok(Json(ApiResponse::success(state.inventario.view(&query).await)))
}
