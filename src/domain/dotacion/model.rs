use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::lenient;
use crate::shared::text::contains_ci;

/// `estado` of stock that has already been worn
pub const USED_STATE: &str = "Usado";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StockItem {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tipo: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub talla: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub cantidad_disponible: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub estado: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entrega {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub responsable_id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub responsable_nombre: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tipo: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub talla: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub cantidad: i64,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub fecha_entrega: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub vencimiento: Option<String>,
}

/// Issuances of one worker, newest first
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EntregaGroup {
    pub responsable_id: String,
    pub responsable_nombre: String,
    pub items: Vec<Entrega>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DotacionKpi {
    pub total: i64,
    pub usados: i64,
}

pub fn filter_stock(items: &[StockItem], term: &str) -> Vec<StockItem> {
    items
        .iter()
        .filter(|i| contains_ci(&i.tipo, term) || contains_ci(&i.talla, term))
        .cloned()
        .collect()
}

/// Group issuances by worker id in first-seen order.
///
/// `entregas` is expected newest first, so every group is too and the groups
/// come out ordered by their latest issuance. The group name is the one on
/// the newest record.
pub fn group_entregas(entregas: &[Entrega]) -> Vec<EntregaGroup> {
    let mut groups: Vec<EntregaGroup> = Vec::new();
    for entrega in entregas {
        match groups
            .iter_mut()
            .find(|g| g.responsable_id == entrega.responsable_id)
        {
            Some(group) => group.items.push(entrega.clone()),
            None => groups.push(EntregaGroup {
                responsable_id: entrega.responsable_id.clone(),
                responsable_nombre: entrega.responsable_nombre.clone(),
                items: vec![entrega.clone()],
            }),
        }
    }
    groups
}

/// Worker name (case-insensitive) or id document number
pub fn filter_groups(groups: Vec<EntregaGroup>, term: &str) -> Vec<EntregaGroup> {
    let needle = term.to_lowercase();
    groups
        .into_iter()
        .filter(|g| contains_ci(&g.responsable_nombre, term) || g.responsable_id.contains(&needle))
        .collect()
}

/// Units on hand and the part of them already used
pub fn stock_totals(items: &[StockItem]) -> DotacionKpi {
    items.iter().fold(DotacionKpi::default(), |mut kpi, item| {
        kpi.total = kpi.total.saturating_add(item.cantidad_disponible);
        if item.estado == USED_STATE {
            kpi.usados = kpi.usados.saturating_add(item.cantidad_disponible);
        }
        kpi
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entrega(id: &str, responsable: &str, nombre: &str, fecha: &str) -> Entrega {
        Entrega {
            id: id.into(),
            responsable_id: responsable.into(),
            responsable_nombre: nombre.into(),
            fecha_entrega: Some(fecha.into()),
            ..Default::default()
        }
    }

    fn stock(tipo: &str, talla: &str, cantidad: i64, estado: &str) -> StockItem {
        StockItem {
            id: format!("{tipo}-{talla}"),
            tipo: tipo.into(),
            talla: talla.into(),
            cantidad_disponible: cantidad,
            estado: estado.into(),
        }
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let entregas = vec![
            entrega("e1", "1020", "ANA", "2024-06-09"),
            entrega("e2", "3040", "LUIS", "2024-06-08"),
            entrega("e3", "1020", "ANA", "2024-06-01"),
        ];
        let groups = group_entregas(&entregas);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].responsable_id, "1020");
        assert_eq!(groups[1].responsable_id, "3040");
        let items: Vec<_> = groups[0].items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(items, ["e1", "e3"]);
    }

    #[test]
    fn groups_filter_by_name_or_id() {
        let groups = group_entregas(&[
            entrega("e1", "1020", "Ana Ruiz", "2024-06-09"),
            entrega("e2", "3040", "Luis Mora", "2024-06-08"),
        ]);
        assert_eq!(filter_groups(groups.clone(), "RUIZ").len(), 1);
        assert_eq!(filter_groups(groups.clone(), "304")[0].responsable_nombre, "Luis Mora");
        assert_eq!(filter_groups(groups, "").len(), 2);
    }

    #[test]
    fn stock_filters_on_type_or_size() {
        let items = vec![stock("Botas", "42", 3, "Nuevo"), stock("Casco", "M", 5, "Nuevo")];
        assert_eq!(filter_stock(&items, "bot").len(), 1);
        assert_eq!(filter_stock(&items, "m")[0].tipo, "Casco");
        assert_eq!(filter_stock(&items, "").len(), 2);
    }

    #[test]
    fn totals_count_used_units() {
        let items = vec![
            stock("Botas", "42", 3, "Nuevo"),
            stock("Casco", "M", 5, "Usado"),
            stock("Guantes", "L", 2, "Usado"),
        ];
        assert_eq!(stock_totals(&items), DotacionKpi { total: 10, usados: 7 });
        assert_eq!(stock_totals(&[]), DotacionKpi::default());
    }

    #[test]
    fn totals_saturate_on_huge_quantities() {
        let huge: StockItem = serde_json::from_value(serde_json::json!({
            "tipo": "Botas",
            "cantidad_disponible": 1e19,
            "estado": "Usado"
        }))
        .unwrap();
        let items = vec![huge, stock("Casco", "M", 5, "Usado")];
        assert_eq!(
            stock_totals(&items),
            DotacionKpi { total: i64::MAX, usados: i64::MAX }
        );
    }
}
