//! Equipment inventory.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::lenient;
use crate::shared::text::contains_ci;

pub const CATEGORIES: [&str; 3] = ["Maquinaria", "Herramientas", "Consumibles"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    EnStock,
    StockBajo,
}

impl StockStatus {
    /// Low stock is anything under a fifth of the maximum
    pub fn derive(stock: i64, max_stock: i64) -> Self {
        if stock.saturating_mul(5) < max_stock {
            StockStatus::StockBajo
        } else {
            StockStatus::EnStock
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sku: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub stock: i64,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub max_stock: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub stock: i64,
    pub max_stock: i64,
    pub status: StockStatus,
}

impl From<InventoryRecord> for InventoryItem {
    fn from(r: InventoryRecord) -> Self {
        Self {
            status: StockStatus::derive(r.stock, r.max_stock),
            id: r.id,
            name: r.name,
            sku: r.sku,
            category: r.category,
            stock: r.stock,
            max_stock: r.max_stock,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryQuery {
    pub search: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct InventorySummary {
    pub items: usize,
    pub units: i64,
    pub low_stock: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InventoryView {
    pub items: Vec<InventoryItem>,
    pub summary: InventorySummary,
}

pub fn inventory_view(records: Vec<InventoryRecord>, query: &InventoryQuery) -> InventoryView {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != "all");
    let items: Vec<InventoryItem> = records
        .into_iter()
        .map(InventoryItem::from)
        .filter(|i| contains_ci(&i.name, &query.search) || contains_ci(&i.sku, &query.search))
        .filter(|i| category.map_or(true, |c| i.category == c))
        .collect();

    let summary = InventorySummary {
        items: items.len(),
        units: items.iter().fold(0i64, |acc, i| acc.saturating_add(i.stock)),
        low_stock: items
            .iter()
            .filter(|i| i.status == StockStatus::StockBajo)
            .count(),
    };
    InventoryView { items, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, sku: &str, category: &str, stock: i64, max: i64) -> InventoryRecord {
        InventoryRecord {
            id: sku.into(),
            name: name.into(),
            sku: sku.into(),
            category: category.into(),
            stock,
            max_stock: max,
        }
    }

    fn records() -> Vec<InventoryRecord> {
        vec![
            record("Generador Industrial X1", "MACH-8829-G", "Maquinaria", 85, 100),
            record("Taladro Percutor DeWalt", "TOOL-1022-D", "Herramientas", 3, 25),
            record("Cinta Adhesiva Reforzada", "CONS-4412-C", "Consumibles", 450, 500),
        ]
    }

    #[test]
    fn status_is_low_under_a_fifth() {
        assert_eq!(StockStatus::derive(3, 25), StockStatus::StockBajo);
        assert_eq!(StockStatus::derive(5, 25), StockStatus::EnStock);
        assert_eq!(StockStatus::derive(0, 0), StockStatus::EnStock);
    }

    #[test]
    fn huge_stock_values_saturate() {
        let drifted: InventoryRecord =
            serde_json::from_value(serde_json::json!({"stock": "2e18", "maxStock": 100})).unwrap();
        assert_eq!(
            StockStatus::derive(drifted.stock, drifted.max_stock),
            StockStatus::EnStock
        );
        assert_eq!(StockStatus::derive(i64::MAX, i64::MAX), StockStatus::EnStock);

        let view = inventory_view(
            vec![
                record("Grua", "MACH-1", "Maquinaria", i64::MAX, 10),
                record("Pala", "TOOL-1", "Herramientas", 7, 10),
            ],
            &InventoryQuery::default(),
        );
        assert_eq!(view.summary.units, i64::MAX);
    }

    #[test]
    fn view_filters_and_summarizes() {
        let view = inventory_view(records(), &InventoryQuery::default());
        assert_eq!(
            view.summary,
            InventorySummary {
                items: 3,
                units: 538,
                low_stock: 1
            }
        );

        let query = InventoryQuery {
            search: "tool".into(),
            category: None,
        };
        assert_eq!(inventory_view(records(), &query).items[0].name, "Taladro Percutor DeWalt");

        let query = InventoryQuery {
            search: String::new(),
            category: Some("Consumibles".into()),
        };
        assert_eq!(inventory_view(records(), &query).items.len(), 1);
    }
}
