//! Rate editor.
//!
//! Edits are applied to the raw `CentroCosto` array so that fields this
//! service does not model (billing rates, notes, ...) survive the write-back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use utoipa::ToSchema;

use crate::shared::errors::{DomainError, DomainResult};
use crate::shared::lenient::to_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RateField {
    Diurna,
    Nocturna,
    ExtraDiurna,
    ExtraNocturna,
}

impl RateField {
    pub fn key(&self) -> &'static str {
        match self {
            RateField::Diurna => "Diurna",
            RateField::Nocturna => "Nocturna",
            RateField::ExtraDiurna => "ExtraDiurna",
            RateField::ExtraNocturna => "ExtraNocturna",
        }
    }
}

/// Cost center addressed by its `id` or by its position in the array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CostCenterRef {
    Id(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateEdit {
    pub cost_center: CostCenterRef,
    pub field: RateField,
    pub value: f64,
}

fn rate_value(value: f64) -> DomainResult<Value> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        return Ok(Value::Number(Number::from(value as i64)));
    }
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| DomainError::Validation(format!("Tarifa inválida: {}", value)))
}

fn take_object(parent: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match parent.remove(key) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Apply `edits` to a copy of the stored `CentroCosto` array.
///
/// Only `tarifas.nomina.<field>` of the addressed cost centers changes; every
/// other element and key is carried over untouched.
pub fn apply_rate_edits(centro_costo: &Value, edits: &[RateEdit]) -> DomainResult<Value> {
    let mut centers = match centro_costo {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        _ => {
            return Err(DomainError::Validation(
                "CentroCosto no es una lista".to_string(),
            ))
        }
    };

    for edit in edits {
        let position = match &edit.cost_center {
            CostCenterRef::Index(i) if *i < centers.len() => Some(*i),
            CostCenterRef::Index(_) => None,
            CostCenterRef::Id(id) => centers
                .iter()
                .position(|cc| cc.get("id").map(to_text).as_deref() == Some(id.as_str())),
        };
        let Some(position) = position else {
            return Err(DomainError::NotFound {
                entity: "CentroCosto",
                field: "id",
                value: format!("{:?}", edit.cost_center),
            });
        };

        let Value::Object(center) = &mut centers[position] else {
            return Err(DomainError::Validation(format!(
                "Centro de costo {} sin datos",
                position
            )));
        };
        let mut tarifas = take_object(center, "tarifas");
        let mut nomina = take_object(&mut tarifas, "nomina");
        nomina.insert(edit.field.key().to_string(), rate_value(edit.value)?);
        tarifas.insert("nomina".to_string(), Value::Object(nomina));
        center.insert("tarifas".to_string(), Value::Object(tarifas));
    }

    Ok(Value::Array(centers))
}
