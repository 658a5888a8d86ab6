//! Personnel roster filtering.

use super::model::Trabajador;
use crate::shared::text::contains_ci;

pub const ACTIVE_STATE: &str = "Activo";

/// `estado` value that disables the state filter
pub const ANY_STATE: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterQuery {
    pub search: String,
    /// `Activo`, `Inactivo` or `all`
    pub estado: String,
}

impl Default for RosterQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            estado: ACTIVE_STATE.to_string(),
        }
    }
}

/// Keep the roster order, drop workers that do not match.
///
/// The search hits the name case-insensitively or the document number as
/// typed.
pub fn filter_roster(roster: &[Trabajador], query: &RosterQuery) -> Vec<Trabajador> {
    roster
        .iter()
        .filter(|t| {
            contains_ci(&t.nombre_apellidos, &query.search)
                || t.numero_documento.contains(&query.search)
        })
        .filter(|t| query.estado == ANY_STATE || t.estado == query.estado)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(id: &str, nombre: &str, doc: &str, estado: &str) -> Trabajador {
        Trabajador {
            id: id.into(),
            nombre_apellidos: nombre.into(),
            numero_documento: doc.into(),
            estado: estado.into(),
            ..Default::default()
        }
    }

    fn roster() -> Vec<Trabajador> {
        vec![
            worker("1", "ANA RUIZ", "1020", "Activo"),
            worker("2", "LUIS MORA", "3040", "Inactivo"),
            worker("3", "MARIA ANAYA", "5060", "Activo"),
        ]
    }

    #[test]
    fn defaults_to_active_workers() {
        let ids: Vec<_> = filter_roster(&roster(), &RosterQuery::default())
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn search_is_case_insensitive_on_name() {
        let query = RosterQuery {
            search: "ana".into(),
            estado: ANY_STATE.into(),
        };
        assert_eq!(filter_roster(&roster(), &query).len(), 2);
    }

    #[test]
    fn search_matches_document_number() {
        let query = RosterQuery {
            search: "304".into(),
            estado: "Inactivo".into(),
        };
        let found = filter_roster(&roster(), &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].nombre_apellidos, "LUIS MORA");
    }
}
