use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::lenient;

/// Role whose screens are limited by [`ModuleAccess`]
pub const RESTRICTED_ROLE: &str = "Auxiliar";

pub const DEFAULT_DISPLAY_NAME: &str = "Usuario AMA";

/// Per-module grants, only consulted for the restricted role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModuleAccess {
    #[serde(rename = "accesoPersonal", default)]
    pub personal: bool,
    #[serde(rename = "accesoDotacion", default)]
    pub dotacion: bool,
    #[serde(rename = "accesoClientes", default)]
    pub clientes: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub nombre: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub foto: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rol: String,
    #[serde(default)]
    pub modulos: ModuleAccess,
}

impl UserProfile {
    pub fn is_restricted(&self) -> bool {
        self.rol == RESTRICTED_ROLE
    }

    pub fn display_name(&self) -> &str {
        if self.nombre.trim().is_empty() {
            DEFAULT_DISPLAY_NAME
        } else {
            &self.nombre
        }
    }
}
