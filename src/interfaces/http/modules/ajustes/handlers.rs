//! Ajustes API handlers

use axum::{extract::State, Extension, Json};

use super::dto::{ChangePasswordRequest, UpdateProfileRequest};
use crate::interfaces::http::common::{ApiResponse, ApiResult, EmptyData};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::auth::AccountInfo;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    put,
    path = "/api/v1/ajustes/profile",
    tag = "Ajustes",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated account", body = ApiResponse<AccountInfo>),
        (status = 401, description = "Not authenticated"),
        (status = 502, description = "Profile could not be saved")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<AccountInfo> {
    let profile = state
        .auth
        .update_profile(&user.session_id, &request.nombre, request.foto)
        .await?;
    Ok(Json(ApiResponse::success(AccountInfo::new(
        user.uid, user.email, profile,
    ))))
}

#[utoipa::path(
    put,
    path = "/api/v1/ajustes/password",
    tag = "Ajustes",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<EmptyData>),
        (status = 400, description = "Passwords differ or are too short"),
        (status = 401, description = "Session too old, sign in again")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<EmptyData> {
    state
        .auth
        .update_password(
            &user.session_id,
            &request.new_password,
            &request.confirm_password,
        )
        .await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
