//! Authentication API handlers

use axum::{extract::State, Extension, Json};

use super::dto::{AccountInfo, LoginRequest, LoginResponse};
use crate::interfaces::http::common::{ApiResponse, ApiResult, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::metrics::LOGINS;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or no profile document")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let outcome = state.auth.login(&request.email, &request.password).await;
    let label = if outcome.is_ok() { "ok" } else { "rejected" };
    metrics::counter!(LOGINS, "outcome" => label).increment(1);
    let result = outcome?;
    Ok(Json(ApiResponse::success(LoginResponse {
        token: result.token,
        token_type: result.token_type,
        expires_in: result.expires_in,
        user: AccountInfo::new(result.uid, result.email, result.profile),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session closed", body = ApiResponse<EmptyData>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<EmptyData> {
    state.auth.logout(&user.session_id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<AccountInfo>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<AccountInfo> {
    let account = state.auth.me(&user.session_id).await?;
    Ok(Json(ApiResponse::success(AccountInfo::new(
        account.uid,
        account.email,
        account.profile,
    ))))
}
