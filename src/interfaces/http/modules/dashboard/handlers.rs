//! Dashboard API handler

use axum::{
    extract::{Query, State},
    Json,
};

use super::dto::DashboardParams;
use crate::domain::dashboard::DashboardView;
use crate::domain::period;
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    params(DashboardParams),
    responses(
        (status = 200, description = "Aggregated KPIs, charts and filter options", body = ApiResponse<DashboardView>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> ApiResult<DashboardView> {
    let view = state.dashboard.view(params.into(), period::today()).await;
    Ok(Json(ApiResponse::success(view)))
}
