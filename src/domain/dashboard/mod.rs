//! Dashboard aggregation over jornadas, sedes and PPE stock.

pub mod aggregate;

pub use aggregate::{
    aggregate, hours_chart, rank_top, ChartPoint, CostCenterOption, DashboardFilter,
    DashboardView, HoursSlice, HoursTotals, SiteOption, SIN_NOMBRE, TOP_CLIENTS,
};
