use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Jornada {
    #[serde(default)]
    pub id: String,
    /// `YYYY-MM-DD`
    #[serde(default, deserialize_with = "lenient::text")]
    pub fecha: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub nombre: String,
    /// Free-text client name, as typed when the shift was recorded
    #[serde(default, deserialize_with = "lenient::text")]
    pub cliente: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub centro_costo_nombre: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub centro_costo_id: String,
    /// Id of the `sedes` document; the dashboard filters on this
    #[serde(default, deserialize_with = "lenient::text")]
    pub sede_id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub hora_inicio: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub hora_fin: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub horas_trabajadas: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub horas_diurnas: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub horas_nocturnas: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub horas_extras_diurnas: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub horas_extras_nocturnas: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub valor_pago: f64,
}

/// Substring with clamped bounds, empty when a bound splits a character
fn clamped(s: &str, start: usize, end: usize) -> &str {
    let end = end.min(s.len());
    s.get(start.min(end)..end).unwrap_or("")
}

impl Jornada {
    /// `YYYY-MM` part of the date
    pub fn month(&self) -> &str {
        clamped(&self.fecha, 0, 7)
    }

    /// `DD` part of the date
    pub fn day(&self) -> &str {
        clamped(&self.fecha, 8, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_loosely_typed_records() {
        let j: Jornada = serde_json::from_value(json!({
            "id": "r1",
            "fecha": "2024-06-03",
            "nombre": "LUIS PEREZ",
            "sedeId": "s1",
            "horasDiurnas": "8",
            "horasNocturnas": null,
            "valorPago": 52000.5
        }))
        .unwrap();

        assert_eq!(j.sede_id, "s1");
        assert_eq!(j.horas_diurnas, 8.0);
        assert_eq!(j.horas_nocturnas, 0.0);
        assert_eq!(j.valor_pago, 52000.5);
        assert_eq!(j.cliente, "");
        assert_eq!(j.month(), "2024-06");
        assert_eq!(j.day(), "03");
    }

    #[test]
    fn short_dates_are_clamped() {
        let j = Jornada {
            fecha: "2024".into(),
            ..Default::default()
        };
        assert_eq!(j.month(), "2024");
        assert_eq!(j.day(), "");
    }
}
