use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::lenient;

/// Stored personnel record.
///
/// Every field is optional on read: older documents were entered by hand and
/// miss most of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trabajador {
    #[serde(default)]
    pub id: String,

    // ── Personal ───────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient::text")]
    pub nombre_apellidos: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub numero_documento: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tipo_documento: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub genero: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub estado_civil: String,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub fecha_nacimiento: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rh: String,

    // ── Contact ────────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient::text")]
    pub correo: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub telefono_contacto: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub direccion_residencia: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub barrio_residencia: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub ciudad: String,

    // ── Social security ────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient::text")]
    pub eps: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pension: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cesantias: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub arl: String,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub arl_fecha: Option<String>,

    // ── Employment ─────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient::text")]
    pub cargo: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub empresa: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub modelo_contrato: String,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub fecha_ingreso_laboral: Option<String>,

    // ── Banking ────────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient::text")]
    pub banco: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tipo_producto: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub numero_cuenta: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub nombre_titular: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub numero_documento_titular: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tipo_documento_titular: String,

    // ── Family ─────────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient::integer")]
    pub numero_hijos: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub edad_hijos: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub nombre_familiar: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub parentesco: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub telefono_familiar: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub telefono_emergencia: String,

    // ── Education ──────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient::text")]
    pub institucion: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub titulo_obtenido: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub anio_culminado: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub ultima_experiencia: String,

    // ── Status ─────────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient::text")]
    pub estado: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub foto: Option<String>,
    /// Creation time (RFC 3339 date part)
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_sparse_legacy_record() {
        let t: Trabajador = serde_json::from_value(json!({
            "id": "w1",
            "nombreApellidos": "ANA RUIZ",
            "numeroDocumento": 1020304050u64,
            "fechaNacimiento": {"$timestamp": "1990-05-01T00:00:00.000Z"},
            "arlFecha": null,
            "numeroHijos": "2"
        }))
        .unwrap();

        assert_eq!(t.numero_documento, "1020304050");
        assert_eq!(t.fecha_nacimiento.as_deref(), Some("1990-05-01"));
        assert_eq!(t.arl_fecha, None);
        assert_eq!(t.numero_hijos, 2);
        assert_eq!(t.estado, "");
    }
}
