//! Dashboard view-state.
//!
//! Filters are exact matches: `month` against the `YYYY-MM` prefix of the
//! record date, `client` against `sedeId`, `cost_center` against
//! `centroCostoNombre`. With no filter at all the current quincena is shown.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::dotacion::{stock_totals, DotacionKpi, StockItem};
use crate::domain::jornada::Jornada;
use crate::domain::period::{quincena_for, DateRange};
use crate::domain::sede::Sede;

/// Label for turns whose client name is missing
pub const SIN_NOMBRE: &str = "Sin Nombre";

/// Size of the client ranking
pub const TOP_CLIENTS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    pub month: Option<String>,
    pub client: Option<String>,
    pub cost_center: Option<String>,
}

impl DashboardFilter {
    pub fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            month: keep(self.month),
            client: keep(self.client),
            cost_center: keep(self.cost_center),
        }
    }

    pub fn is_active(&self) -> bool {
        self.month.is_some() || self.client.is_some() || self.cost_center.is_some()
    }

    fn matches(&self, j: &Jornada) -> bool {
        self.month.as_deref().map_or(true, |m| j.month() == m)
            && self.client.as_deref().map_or(true, |c| j.sede_id == c)
            && self
                .cost_center
                .as_deref()
                .map_or(true, |cc| j.centro_costo_nombre == cc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChartPoint {
    pub name: String,
    pub turnos: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct HoursTotals {
    pub diurnas: f64,
    pub nocturnas: f64,
    pub extras_diurnas: f64,
    pub extras_nocturnas: f64,
}

impl HoursTotals {
    fn add(&mut self, j: &Jornada) {
        self.diurnas += j.horas_diurnas;
        self.nocturnas += j.horas_nocturnas;
        self.extras_diurnas += j.horas_extras_diurnas;
        self.extras_nocturnas += j.horas_extras_nocturnas;
    }
}

/// Pie slice of the hours chart
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HoursSlice {
    pub name: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SiteOption {
    pub id: String,
    pub cliente: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CostCenterOption {
    pub id: String,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardView {
    pub monthly_mode: bool,
    /// Set when the quincena default was applied
    pub period: Option<DateRange>,
    pub filtered_count: usize,
    pub total_cost: f64,
    pub evolution: Vec<ChartPoint>,
    pub by_client: Vec<ChartPoint>,
    pub hours: HoursTotals,
    pub hours_chart: Vec<HoursSlice>,
    pub client_options: Vec<SiteOption>,
    pub cost_center_options: Vec<CostCenterOption>,
    pub dotacion: DotacionKpi,
}

/// Chart-ready hours, zero categories left out
pub fn hours_chart(totals: &HoursTotals) -> Vec<HoursSlice> {
    [
        ("Diurnas", totals.diurnas, "#f59e0b"),
        ("Nocturnas", totals.nocturnas, "#8b5cf6"),
        ("Extras D.", totals.extras_diurnas, "#10b981"),
        ("Extras N.", totals.extras_nocturnas, "#6366f1"),
    ]
    .into_iter()
    .filter(|(_, value, _)| *value > 0.0)
    .map(|(name, value, color)| HoursSlice {
        name: name.to_string(),
        value,
        color: color.to_string(),
    })
    .collect()
}

/// Count occurrences and keep the `limit` largest.
///
/// Ties keep the order in which the keys were first seen.
pub fn rank_top<'a>(keys: impl Iterator<Item = &'a str>, limit: usize) -> Vec<ChartPoint> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut points: Vec<ChartPoint> = Vec::new();
    for key in keys {
        match index.get(key) {
            Some(&i) => points[i].turnos += 1,
            None => {
                index.insert(key, points.len());
                points.push(ChartPoint {
                    name: key.to_string(),
                    turnos: 1,
                });
            }
        }
    }
    points.sort_by(|a, b| b.turnos.cmp(&a.turnos));
    points.truncate(limit);
    points
}

fn evolution(records: &[&Jornada], monthly: bool) -> Vec<ChartPoint> {
    let mut buckets: BTreeMap<&str, usize> = BTreeMap::new();
    for j in records {
        let key = if monthly { j.day() } else { j.month() };
        if key.is_empty() {
            continue;
        }
        *buckets.entry(key).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(name, turnos)| ChartPoint {
            name: name.to_string(),
            turnos,
        })
        .collect()
}

/// Sites that have at least one jornada, in site order
fn client_options(jornadas: &[Jornada], sedes: &[Sede]) -> Vec<SiteOption> {
    let with_turns: HashSet<&str> = jornadas
        .iter()
        .map(|j| j.sede_id.as_str())
        .filter(|id| !id.is_empty())
        .collect();
    sedes
        .iter()
        .filter(|s| with_turns.contains(s.id.as_str()))
        .map(|s| SiteOption {
            id: s.id.clone(),
            cliente: s.cliente.clone(),
        })
        .collect()
}

fn cost_center_options(sedes: &[Sede], client: Option<&str>) -> Vec<CostCenterOption> {
    let Some(client) = client else {
        return Vec::new();
    };
    sedes
        .iter()
        .find(|s| s.id == client)
        .map(|s| {
            s.centro_costo
                .iter()
                .map(|cc| CostCenterOption {
                    id: cc.id.clone(),
                    nombre: cc.nombre.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn aggregate(
    jornadas: &[Jornada],
    sedes: &[Sede],
    stock: &[StockItem],
    filter: DashboardFilter,
    today: NaiveDate,
) -> DashboardView {
    let filter = filter.normalized();
    let period = (!filter.is_active()).then(|| quincena_for(today));

    let visible: Vec<&Jornada> = jornadas
        .iter()
        .filter(|j| match &period {
            Some(range) => range.contains(&j.fecha),
            None => filter.matches(j),
        })
        .collect();

    let monthly_mode = filter.month.is_some();
    let mut hours = HoursTotals::default();
    let mut total_cost = 0.0;
    for j in &visible {
        hours.add(j);
        total_cost += j.valor_pago;
    }

    let client_names = visible.iter().map(|j| {
        if j.cliente.is_empty() {
            SIN_NOMBRE
        } else {
            j.cliente.as_str()
        }
    });

    DashboardView {
        monthly_mode,
        period,
        filtered_count: visible.len(),
        total_cost,
        evolution: evolution(&visible, monthly_mode),
        by_client: rank_top(client_names, TOP_CLIENTS),
        hours_chart: hours_chart(&hours),
        hours,
        client_options: client_options(jornadas, sedes),
        cost_center_options: cost_center_options(sedes, filter.client.as_deref()),
        dotacion: stock_totals(stock),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sede::CentroCosto;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn turn(fecha: &str, cliente: &str, sede: &str, cc: &str) -> Jornada {
        Jornada {
            fecha: fecha.into(),
            cliente: cliente.into(),
            sede_id: sede.into(),
            centro_costo_nombre: cc.into(),
            ..Default::default()
        }
    }

    fn month(m: &str) -> DashboardFilter {
        DashboardFilter {
            month: Some(m.into()),
            ..Default::default()
        }
    }

    #[test]
    fn hours_breakdown_sums_and_skips_zero_categories() {
        let mut a = turn("2024-06-02", "A", "s1", "CC1");
        a.horas_diurnas = 8.0;
        a.horas_extras_diurnas = 2.0;
        a.valor_pago = 100_000.0;
        let mut b = turn("2024-06-03", "A", "s1", "CC1");
        b.horas_diurnas = 4.0;
        b.valor_pago = 50_000.0;

        let view = aggregate(&[a, b], &[], &[], month("2024-06"), today());

        assert_eq!(view.hours.diurnas, 12.0);
        assert_eq!(view.hours.extras_diurnas, 2.0);
        assert_eq!(view.hours.nocturnas, 0.0);
        let names: Vec<_> = view.hours_chart.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Diurnas", "Extras D."]);
        assert_eq!(view.hours_chart[0].color, "#f59e0b");
        assert_eq!(view.total_cost, 150_000.0);
        assert_eq!(view.filtered_count, 2);
    }

    #[test]
    fn top_clients_rank_descending_with_stable_ties() {
        let keys = ["C", "A", "B", "A", "D", "E", "F", "B", "A"];
        let ranked = rank_top(keys.into_iter(), TOP_CLIENTS);
        let names: Vec<_> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D", "E"]);
        assert_eq!(ranked[0].turnos, 3);
        assert_eq!(ranked[1].turnos, 2);
    }

    #[test]
    fn missing_client_is_sin_nombre() {
        let view = aggregate(
            &[turn("2024-06-02", "", "s1", "CC1")],
            &[],
            &[],
            month("2024-06"),
            today(),
        );
        assert_eq!(view.by_client[0].name, SIN_NOMBRE);
    }

    #[test]
    fn month_filter_buckets_by_day() {
        let records = vec![
            turn("2024-05-20", "A", "s1", "CC1"),
            turn("2024-05-03", "A", "s1", "CC1"),
            turn("2024-05-20", "B", "s2", "CC1"),
            turn("2024-04-30", "A", "s1", "CC1"),
        ];
        let view = aggregate(&records, &[], &[], month("2024-05"), today());
        assert!(view.monthly_mode);
        assert_eq!(view.period, None);
        assert_eq!(
            view.evolution,
            vec![
                ChartPoint { name: "03".into(), turnos: 1 },
                ChartPoint { name: "20".into(), turnos: 2 },
            ]
        );
    }

    #[test]
    fn client_filter_buckets_by_month() {
        let records = vec![
            turn("2024-05-20", "A", "s1", "CC1"),
            turn("2024-04-03", "A", "s1", "CC2"),
            turn("2024-05-21", "B", "s2", "CC1"),
        ];
        let filter = DashboardFilter {
            client: Some("s1".into()),
            ..Default::default()
        };
        let view = aggregate(&records, &[], &[], filter, today());
        assert!(!view.monthly_mode);
        let names: Vec<_> = view.evolution.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["2024-04", "2024-05"]);

        let filter = DashboardFilter {
            client: Some("s1".into()),
            cost_center: Some("CC2".into()),
            ..Default::default()
        };
        assert_eq!(aggregate(&records, &[], &[], filter, today()).filtered_count, 1);
    }

    #[test]
    fn no_filter_defaults_to_quincena() {
        let records = vec![
            turn("2024-06-01", "A", "s1", "CC1"),
            turn("2024-06-16", "A", "s1", "CC1"),
            turn("2024-05-10", "A", "s1", "CC1"),
        ];
        let view = aggregate(&records, &[], &[], DashboardFilter::default(), today());
        assert_eq!(view.period, Some(DateRange::new("2024-06-01", "2024-06-15")));
        assert_eq!(view.filtered_count, 1);
    }

    #[test]
    fn options_come_from_sites_with_turns() {
        let sedes = vec![
            Sede {
                id: "s1".into(),
                cliente: "Clinica".into(),
                centro_costo: vec![CentroCosto {
                    id: "cc1".into(),
                    nombre: "Urgencias".into(),
                    ..Default::default()
                }],
                ..Default::default()
            },
            Sede {
                id: "s2".into(),
                cliente: "Hotel".into(),
                ..Default::default()
            },
        ];
        let records = vec![turn("2024-06-01", "Clinica", "s1", "Urgencias")];

        let view = aggregate(&records, &sedes, &[], DashboardFilter::default(), today());
        assert_eq!(view.client_options.len(), 1);
        assert_eq!(view.client_options[0].cliente, "Clinica");
        assert!(view.cost_center_options.is_empty());

        let filter = DashboardFilter {
            client: Some("s1".into()),
            ..Default::default()
        };
        let view = aggregate(&records, &sedes, &[], filter, today());
        assert_eq!(view.cost_center_options[0].nombre, "Urgencias");
    }

    #[test]
    fn dotacion_kpi_is_included() {
        let stock = vec![StockItem {
            cantidad_disponible: 4,
            estado: "Usado".into(),
            ..Default::default()
        }];
        let view = aggregate(&[], &[], &stock, DashboardFilter::default(), today());
        assert_eq!(view.dotacion, DotacionKpi { total: 4, usados: 4 });
    }
}
