//! Dashboard query parameters

use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::dashboard::DashboardFilter;

/// Dashboard filters; with none set the current quincena is shown
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardParams {
    /// `YYYY-MM`
    pub month: Option<String>,
    /// Sede id
    pub client: Option<String>,
    /// Cost center id within the selected sede
    pub cost_center: Option<String>,
}

impl From<DashboardParams> for DashboardFilter {
    fn from(p: DashboardParams) -> Self {
        DashboardFilter {
            month: p.month,
            client: p.client,
            cost_center: p.cost_center,
        }
        .normalized()
    }
}
