use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::load;
use crate::domain::dotacion::{
    filter_groups, filter_stock, group_entregas, stock_totals, DotacionKpi, Entrega,
    EntregaGroup, StockItem,
};
use crate::domain::ports::{decode_all, Collection, Document, DocumentStore, OrderBy};

/// Stock tab: matching items plus totals over the whole stock
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StockView {
    pub items: Vec<StockItem>,
    pub kpi: DotacionKpi,
}

/// Both tabs of the screen, as pushed by the live feed
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DotacionScreen {
    pub stock: StockView,
    pub entregas: Vec<EntregaGroup>,
}

pub struct DotacionService {
    documents: Arc<dyn DocumentStore>,
}

impl DotacionService {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    pub fn sources() -> Vec<(Collection, Option<OrderBy>)> {
        vec![
            (Collection::Dotacion, None),
            (Collection::EntregasEpp, Some(OrderBy::desc("fechaEntrega"))),
        ]
    }

    pub async fn stock(&self, search: &str) -> StockView {
        let docs = load(self.documents.as_ref(), Collection::Dotacion, None).await;
        stock_view(&docs, search)
    }

    pub async fn entregas(&self, search: &str) -> Vec<EntregaGroup> {
        let order = OrderBy::desc("fechaEntrega");
        let docs = load(self.documents.as_ref(), Collection::EntregasEpp, Some(&order)).await;
        entrega_groups(&docs, search)
    }
}

fn stock_view(docs: &[Document], search: &str) -> StockView {
    let stock: Vec<StockItem> = decode_all(Collection::Dotacion, docs);
    StockView {
        items: filter_stock(&stock, search),
        kpi: stock_totals(&stock),
    }
}

fn entrega_groups(docs: &[Document], search: &str) -> Vec<EntregaGroup> {
    let entregas: Vec<Entrega> = decode_all(Collection::EntregasEpp, docs);
    filter_groups(group_entregas(&entregas), search)
}

pub fn project_dotacion(stock: &[Document], entregas: &[Document], search: &str) -> DotacionScreen {
    DotacionScreen {
        stock: stock_view(stock, search),
        entregas: entrega_groups(entregas, search),
    }
}
