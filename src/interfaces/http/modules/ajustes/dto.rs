//! Ajustes DTOs

use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub nombre: String,
    /// URL to keep, or a `data:image/...;base64,` URL to upload
    pub foto: Option<String>,
}

/// Checked in order: match, length, fresh session
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub new_password: String,
    pub confirm_password: String,
}
