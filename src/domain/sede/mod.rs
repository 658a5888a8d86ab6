//! Sede aggregate
//!
//! A client site with its cost centers and their payroll rates.

pub mod model;
pub mod rates;

pub use model::{search_sedes, CentroCosto, NominaRates, Sede, Tarifas};
pub use rates::{apply_rate_edits, CostCenterRef, RateEdit, RateField};
