use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::lenient;
use crate::shared::text::contains_ci;

/// Hourly payroll rates of a cost center
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NominaRates {
    #[serde(rename = "Diurna", default, deserialize_with = "lenient::number")]
    pub diurna: f64,
    #[serde(rename = "Nocturna", default, deserialize_with = "lenient::number")]
    pub nocturna: f64,
    #[serde(rename = "ExtraDiurna", default, deserialize_with = "lenient::number")]
    pub extra_diurna: f64,
    #[serde(rename = "ExtraNocturna", default, deserialize_with = "lenient::number")]
    pub extra_nocturna: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Tarifas {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub nomina: NominaRates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CentroCosto {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub nombre: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub tarifas: Tarifas,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Sede {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "Cliente", default, deserialize_with = "lenient::text")]
    pub cliente: String,
    #[serde(rename = "NIT", default, deserialize_with = "lenient::text")]
    pub nit: String,
    #[serde(rename = "CentroCosto", default, deserialize_with = "lenient::or_default")]
    pub centro_costo: Vec<CentroCosto>,
}

/// Client name (case-insensitive) or NIT (exact substring)
pub fn search_sedes(sedes: &[Sede], term: &str) -> Vec<Sede> {
    sedes
        .iter()
        .filter(|s| contains_ci(&s.cliente, term) || s.nit.contains(term))
        .cloned()
        .collect()
}
