//! Personal API handlers

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreatedResponse, PhotoParams, PhotoResponse, RosterParams};
use crate::domain::trabajador::{NewTrabajador, Trabajador};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::state::AppState;

/// Largest accepted photo body
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

#[utoipa::path(
    get,
    path = "/api/v1/personal",
    tag = "Personal",
    params(RosterParams),
    responses(
        (status = 200, description = "Workers ordered by name", body = ApiResponse<Vec<Trabajador>>),
        (status = 403, description = "No access to Personal")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_trabajadores(
    State(state): State<AppState>,
    Query(params): Query<RosterParams>,
) -> ApiResult<Vec<Trabajador>> {
    let roster = state.personal.roster(&params.into()).await;
    Ok(Json(ApiResponse::success(roster)))
}

#[utoipa::path(
    get,
    path = "/api/v1/personal/{id}",
    tag = "Personal",
    params(("id" = String, Path, description = "Worker document id")),
    responses(
        (status = 200, description = "Worker detail", body = ApiResponse<Trabajador>),
        (status = 404, description = "Worker not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_trabajador(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Trabajador> {
    let trabajador = state.personal.get(&id).await?;
    Ok(Json(ApiResponse::success(trabajador)))
}

#[utoipa::path(
    post,
    path = "/api/v1/personal",
    tag = "Personal",
    request_body = NewTrabajador,
    responses(
        (status = 201, description = "Worker created", body = ApiResponse<CreatedResponse>),
        (status = 422, description = "Invalid form"),
        (status = 502, description = "Backend write failed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_trabajador(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<NewTrabajador>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedResponse>>), ApiError> {
    let id = state.personal.create(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatedResponse { id })),
    ))
}

/// Raw image body; the file name comes in the query string
#[utoipa::path(
    post,
    path = "/api/v1/personal/photo",
    tag = "Personal",
    params(PhotoParams),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Download URL of the stored photo", body = ApiResponse<PhotoResponse>),
        (status = 400, description = "Empty body"),
        (status = 502, description = "Upload failed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_photo(
    State(state): State<AppState>,
    Query(params): Query<PhotoParams>,
    body: Bytes,
) -> ApiResult<PhotoResponse> {
    if body.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "La imagen está vacía"));
    }
    let url = state
        .personal
        .upload_photo(&params.file_name, body.to_vec())
        .await?;
    Ok(Json(ApiResponse::success(PhotoResponse { url })))
}
