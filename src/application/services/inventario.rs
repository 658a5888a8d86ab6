use std::sync::Arc;

use super::load;
use crate::domain::inventario::{inventory_view, InventoryQuery, InventoryRecord, InventoryView};
use crate::domain::ports::{decode_all, Collection, DocumentStore, OrderBy};

pub struct InventarioService {
    documents: Arc<dyn DocumentStore>,
}

impl InventarioService {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    pub async fn view(&self, query: &InventoryQuery) -> InventoryView {
        let order = OrderBy::asc("name");
        let docs = load(self.documents.as_ref(), Collection::Inventario, Some(&order)).await;
        let records: Vec<InventoryRecord> = decode_all(Collection::Inventario, &docs);
        inventory_view(records, query)
    }
}
