//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::user::{has_access, Module, ModuleAccess};
use crate::domain::UserProfile;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "El correo es obligatorio"))]
    pub email: String,
    #[validate(length(min = 1, message = "La contraseña es obligatoria"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: AccountInfo,
}

/// Signed-in account and what the navigation may show
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountInfo {
    pub uid: String,
    pub email: String,
    /// `nombre`, or the default display name when empty
    pub display_name: String,
    pub foto: Option<String>,
    pub rol: String,
    pub modulos: ModuleAccess,
    /// Modules this account may open
    pub allowed_modules: Vec<Module>,
}

impl AccountInfo {
    pub fn new(uid: String, email: String, profile: UserProfile) -> Self {
        let allowed_modules = Module::ALL
            .into_iter()
            .filter(|m| has_access(&profile.rol, &profile.modulos, *m))
            .collect();
        Self {
            uid,
            email,
            display_name: profile.display_name().to_string(),
            foto: profile.foto,
            rol: profile.rol,
            modulos: profile.modulos,
            allowed_modules,
        }
    }
}
