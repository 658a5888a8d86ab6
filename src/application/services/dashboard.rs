use std::sync::Arc;

use chrono::NaiveDate;

use super::load;
use crate::domain::dashboard::{aggregate, DashboardFilter, DashboardView};
use crate::domain::dotacion::StockItem;
use crate::domain::jornada::Jornada;
use crate::domain::ports::{decode_all, Collection, Document, DocumentStore, OrderBy};
use crate::domain::sede::Sede;

pub struct DashboardService {
    documents: Arc<dyn DocumentStore>,
}

impl DashboardService {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Collections the dashboard reads, in `project_dashboard` argument order
    pub fn sources() -> Vec<(Collection, Option<OrderBy>)> {
        vec![
            (Collection::RegistrosJornadas, Some(OrderBy::asc("fecha"))),
            (Collection::Sedes, None),
            (Collection::Dotacion, None),
        ]
    }

    pub async fn view(&self, filter: DashboardFilter, today: NaiveDate) -> DashboardView {
        let order = OrderBy::asc("fecha");
        let (jornadas, sedes, stock) = tokio::join!(
            load(self.documents.as_ref(), Collection::RegistrosJornadas, Some(&order)),
            load(self.documents.as_ref(), Collection::Sedes, None),
            load(self.documents.as_ref(), Collection::Dotacion, None),
        );
        project_dashboard(&jornadas, &sedes, &stock, filter, today)
    }
}

pub fn project_dashboard(
    jornadas: &[Document],
    sedes: &[Document],
    stock: &[Document],
    filter: DashboardFilter,
    today: NaiveDate,
) -> DashboardView {
    let jornadas: Vec<Jornada> = decode_all(Collection::RegistrosJornadas, jornadas);
    let sedes: Vec<Sede> = decode_all(Collection::Sedes, sedes);
    let stock: Vec<StockItem> = decode_all(Collection::Dotacion, stock);
    aggregate(&jornadas, &sedes, &stock, filter, today)
}
