//! Dotación (PPE) aggregate: stock on hand and issuances to workers.

pub mod model;

pub use model::{
    filter_groups, filter_stock, group_entregas, stock_totals, DotacionKpi, Entrega,
    EntregaGroup, StockItem, USED_STATE,
};
