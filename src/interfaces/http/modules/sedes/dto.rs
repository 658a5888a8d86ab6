//! Sedes DTOs

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::sede::RateEdit;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SedeParams {
    /// Substring of `Cliente` (any case) or `NIT`
    #[serde(default)]
    pub search: String,
}

/// Rate edits applied together and written in one update
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRatesRequest {
    pub edits: Vec<RateEdit>,
}
