//! Jornadas query parameters

use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::jornada::JornadaQuery;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JornadaParams {
    /// Substring of the worker name or document number
    #[serde(default)]
    pub search: String,
    /// Client name, or `all`
    pub client: Option<String>,
    /// Cost center name, or `all`
    pub cost_center: Option<String>,
    /// `YYYY-MM-DD`; with `to`, replaces the current quincena
    pub from: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    pub to: Option<String>,
}

impl From<JornadaParams> for JornadaQuery {
    fn from(p: JornadaParams) -> Self {
        JornadaQuery {
            search: p.search,
            client: p.client,
            cost_center: p.cost_center,
            from: p.from,
            to: p.to,
        }
    }
}
