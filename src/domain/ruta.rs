//! Delivery routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::lenient;
use crate::shared::text::contains_ci;

pub const STATUSES: [&str; 3] = ["en_progreso", "completado", "pendiente"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ruta {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub vehicle_id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub driver_name: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub driver_photo: Option<String>,
    /// Percentage, clamped to 0..=100 on read
    #[serde(default, deserialize_with = "lenient::integer")]
    pub progress: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub last_location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RutaQuery {
    pub search: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RutaSummary {
    pub en_progreso: usize,
    pub completado: usize,
    pub pendiente: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RutaView {
    pub routes: Vec<Ruta>,
    pub summary: RutaSummary,
}

pub fn ruta_view(routes: Vec<Ruta>, query: &RutaQuery) -> RutaView {
    let status = query.status.as_deref().filter(|s| !s.is_empty() && *s != "all");
    let routes: Vec<Ruta> = routes
        .into_iter()
        .map(|mut r| {
            r.progress = r.progress.clamp(0, 100);
            r
        })
        .filter(|r| {
            contains_ci(&r.name, &query.search)
                || contains_ci(&r.driver_name, &query.search)
                || contains_ci(&r.vehicle_id, &query.search)
        })
        .filter(|r| status.map_or(true, |s| r.status == s))
        .collect();

    let mut summary = RutaSummary::default();
    for r in &routes {
        match r.status.as_str() {
            "en_progreso" => summary.en_progreso += 1,
            "completado" => summary.completado += 1,
            "pendiente" => summary.pendiente += 1,
            _ => {}
        }
    }
    RutaView { routes, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ruta(name: &str, driver: &str, vehicle: &str, progress: i64, status: &str) -> Ruta {
        Ruta {
            id: name.into(),
            name: name.into(),
            vehicle_id: vehicle.into(),
            driver_name: driver.into(),
            progress,
            status: status.into(),
            ..Default::default()
        }
    }

    #[test]
    fn search_spans_name_driver_and_vehicle() {
        let routes = vec![
            ruta("Ruta A-12: Zona Norte", "Carlos Méndez", "FR-442", 65, "en_progreso"),
            ruta("Ruta C-08: Centro", "Ana Silva", "TR-901", 100, "completado"),
        ];
        for term in ["norte", "CARLOS", "fr-4"] {
            let view = ruta_view(routes.clone(), &RutaQuery { search: term.into(), status: None });
            assert_eq!(view.routes.len(), 1, "{term}");
        }
    }

    #[test]
    fn summary_counts_statuses_and_progress_is_clamped() {
        let routes = vec![
            ruta("a", "x", "1", 150, "en_progreso"),
            ruta("b", "y", "2", -3, "pendiente"),
            ruta("c", "z", "3", 100, "completado"),
        ];
        let view = ruta_view(routes, &RutaQuery::default());
        assert_eq!(
            view.summary,
            RutaSummary {
                en_progreso: 1,
                completado: 1,
                pendiente: 1
            }
        );
        assert_eq!(view.routes[0].progress, 100);
        assert_eq!(view.routes[1].progress, 0);

        let only_done = RutaQuery {
            search: String::new(),
            status: Some("completado".into()),
        };
        let view = ruta_view(view.routes, &only_done);
        assert_eq!(view.routes.len(), 1);
    }
}
