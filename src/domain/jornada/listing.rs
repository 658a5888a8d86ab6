//! Payroll list: filtering, ordering and totals.
//!
//! Without any manual filter the list shows the current quincena. As soon as
//! one filter is set, the quincena default is dropped and the name search,
//! client, cost center and date range apply together.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::model::Jornada;
use crate::domain::period::{quincena_for, DateRange};
use crate::shared::text::{collate, contains_ci};

/// Selector value that means "no filter"
pub const ALL: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JornadaQuery {
    pub search: String,
    pub client: Option<String>,
    pub cost_center: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

fn selector(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != ALL)
}

fn bound(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl JornadaQuery {
    /// Treat empty strings and `all` the way the screen's selectors do
    pub fn normalized(self) -> Self {
        Self {
            search: self.search,
            client: selector(self.client),
            cost_center: selector(self.cost_center),
            from: bound(self.from),
            to: bound(self.to),
        }
    }

    pub fn is_manual(&self) -> bool {
        !self.search.is_empty()
            || self.client.is_some()
            || self.cost_center.is_some()
            || self.from.is_some()
            || self.to.is_some()
    }

    /// Date range actually applied to the list
    pub fn effective_range(&self, today: NaiveDate) -> DateRange {
        if self.is_manual() {
            DateRange {
                from: self.from.clone(),
                to: self.to.clone(),
            }
        } else {
            quincena_for(today)
        }
    }

    fn matches(&self, j: &Jornada, range: &DateRange) -> bool {
        if !self.is_manual() {
            return range.contains(&j.fecha);
        }
        contains_ci(&j.nombre, &self.search)
            && self.client.as_deref().map_or(true, |c| j.cliente == c)
            && self
                .cost_center
                .as_deref()
                .map_or(true, |cc| j.centro_costo_nombre == cc)
            && range.contains(&j.fecha)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct JornadaStats {
    pub total: usize,
    /// Sum of `valorPago`, rounded to whole pesos
    pub nomina: i64,
    pub horas: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FilterOptions {
    pub clientes: Vec<String>,
    pub ccs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JornadaListing {
    pub manual_filter: bool,
    pub period: DateRange,
    pub records: Vec<Jornada>,
    pub stats: JornadaStats,
    pub options: FilterOptions,
}

pub fn visible_jornadas(records: &[Jornada], query: &JornadaQuery, today: NaiveDate) -> Vec<Jornada> {
    let range = query.effective_range(today);
    records
        .iter()
        .filter(|j| query.matches(j, &range))
        .cloned()
        .collect()
}

/// Client, cost center and worker ascending, then newest date first
pub fn sort_jornadas(records: &mut [Jornada]) {
    records.sort_by(|a, b| {
        collate(&a.cliente, &b.cliente)
            .then_with(|| collate(&a.centro_costo_nombre, &b.centro_costo_nombre))
            .then_with(|| collate(&a.nombre, &b.nombre))
            .then_with(|| b.fecha.cmp(&a.fecha))
    });
}

/// Half-up rounding, matching what the payroll sheet shows
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn stats(records: &[Jornada]) -> JornadaStats {
    JornadaStats {
        total: records.len(),
        nomina: round_half_up(records.iter().map(|j| j.valor_pago).sum()),
        horas: records.iter().map(|j| j.horas_trabajadas).sum(),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Selector values, taken from every record regardless of the filters
pub fn filter_options(records: &[Jornada]) -> FilterOptions {
    FilterOptions {
        clientes: distinct(records.iter().map(|j| j.cliente.as_str())),
        ccs: distinct(records.iter().map(|j| j.centro_costo_nombre.as_str())),
    }
}

pub fn build_listing(records: &[Jornada], query: JornadaQuery, today: NaiveDate) -> JornadaListing {
    let query = query.normalized();
    let mut visible = visible_jornadas(records, &query, today);
    sort_jornadas(&mut visible);

    JornadaListing {
        manual_filter: query.is_manual(),
        period: query.effective_range(today),
        stats: stats(&visible),
        options: filter_options(records),
        records: visible,
    }
}
