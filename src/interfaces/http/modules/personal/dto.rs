//! Personal DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::trabajador::{RosterQuery, ACTIVE_STATE};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RosterParams {
    /// Substring of the name (any case) or of the document number
    #[serde(default)]
    pub search: String,
    /// `Activo` (default), `Inactivo` or `all`
    pub estado: Option<String>,
}

impl From<RosterParams> for RosterQuery {
    fn from(p: RosterParams) -> Self {
        RosterQuery {
            search: p.search,
            estado: p
                .estado
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| ACTIVE_STATE.to_string()),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhotoParams {
    /// Original file name; also decides the stored content type
    pub file_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PhotoResponse {
    pub url: String,
}
