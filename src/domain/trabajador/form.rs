//! Onboarding form.
//!
//! Defaults mirror the blank form the coordinators fill in; select fields only
//! accept the listed options.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::domain::ports::{timestamp_value, Fields};
use crate::shared::errors::{DomainError, DomainResult};

/// Fields stored in upper case
pub const UPPERCASE_FIELDS: [&str; 10] = [
    "nombreApellidos",
    "rh",
    "direccionResidencia",
    "barrioResidencia",
    "cargo",
    "nombreTitular",
    "nombreFamiliar",
    "parentesco",
    "institucion",
    "tituloObtenido",
];

/// `YYYY-MM-DD` inputs stored as timestamps, or `null` when left blank
pub const DATE_FIELDS: [&str; 3] = ["fechaNacimiento", "fechaIngresoLaboral", "arlFecha"];

/// Blob prefix for worker photos
pub const PHOTO_PREFIX: &str = "fotos_personal";

fn one_of(value: &str, options: &[&str], code: &'static str) -> Result<(), ValidationError> {
    if options.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(code))
    }
}

fn validate_tipo_documento(value: &String) -> Result<(), ValidationError> {
    one_of(value, &["CC", "CE", "PEP"], "tipo_documento")
}

fn validate_tipo_documento_titular(value: &String) -> Result<(), ValidationError> {
    one_of(value, &["CC", "CE"], "tipo_documento_titular")
}

fn validate_genero(value: &String) -> Result<(), ValidationError> {
    one_of(value, &["MASCULINO", "FEMENINO", "OTRO"], "genero")
}

fn validate_estado_civil(value: &String) -> Result<(), ValidationError> {
    one_of(value, &["SOLTERO", "CASADO", "UNION LIBRE"], "estado_civil")
}

fn validate_modelo_contrato(value: &String) -> Result<(), ValidationError> {
    one_of(
        value,
        &["CONTRATO DE SERVICIOS", "TERMINO FIJO", "INDEFINIDO"],
        "modelo_contrato",
    )
}

/// `DP` = ahorros, `CC` = corriente
fn validate_tipo_producto(value: &String) -> Result<(), ValidationError> {
    one_of(value, &["DP", "CC"], "tipo_producto")
}

fn validate_correo(value: &String) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("correo"))
    }
}

fn validate_estado(value: &String) -> Result<(), ValidationError> {
    one_of(value, &["Activo", "Inactivo"], "estado")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTrabajador {
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    pub nombre_apellidos: String,
    #[validate(length(min = 1, message = "El número de documento es obligatorio"))]
    pub numero_documento: String,
    #[validate(custom(function = "validate_tipo_documento"))]
    pub tipo_documento: String,
    #[validate(custom(function = "validate_genero"))]
    pub genero: String,
    #[validate(custom(function = "validate_estado_civil"))]
    pub estado_civil: String,
    pub fecha_nacimiento: String,
    #[validate(custom(function = "validate_correo"))]
    pub correo: String,
    pub telefono_contacto: String,
    pub direccion_residencia: String,
    pub barrio_residencia: String,
    pub ciudad: String,
    pub rh: String,
    pub eps: String,
    pub pension: String,
    pub cesantias: String,
    pub arl: String,
    pub arl_fecha: String,
    pub cargo: String,
    pub empresa: String,
    #[validate(custom(function = "validate_modelo_contrato"))]
    pub modelo_contrato: String,
    pub fecha_ingreso_laboral: String,
    pub banco: String,
    #[validate(custom(function = "validate_tipo_producto"))]
    pub tipo_producto: String,
    pub numero_cuenta: String,
    pub nombre_titular: String,
    pub numero_documento_titular: String,
    #[validate(custom(function = "validate_tipo_documento_titular"))]
    pub tipo_documento_titular: String,
    #[validate(range(min = 0, message = "Número de hijos inválido"))]
    pub numero_hijos: i64,
    pub edad_hijos: String,
    pub nombre_familiar: String,
    pub parentesco: String,
    pub telefono_familiar: String,
    pub telefono_emergencia: String,
    pub institucion: String,
    pub titulo_obtenido: String,
    pub anio_culminado: String,
    pub ultima_experiencia: String,
    #[validate(custom(function = "validate_estado"))]
    pub estado: String,
    pub foto: String,
}

impl Default for NewTrabajador {
    fn default() -> Self {
        Self {
            nombre_apellidos: String::new(),
            numero_documento: String::new(),
            tipo_documento: "CC".into(),
            genero: "MASCULINO".into(),
            estado_civil: "SOLTERO".into(),
            fecha_nacimiento: String::new(),
            correo: String::new(),
            telefono_contacto: String::new(),
            direccion_residencia: String::new(),
            barrio_residencia: String::new(),
            ciudad: "Bogotá".into(),
            rh: "A+".into(),
            eps: String::new(),
            pension: String::new(),
            cesantias: String::new(),
            arl: "ARL Sura".into(),
            arl_fecha: String::new(),
            cargo: "OPERATIVO".into(),
            empresa: "NO INFO".into(),
            modelo_contrato: "CONTRATO DE SERVICIOS".into(),
            fecha_ingreso_laboral: String::new(),
            banco: "Banco Davivienda".into(),
            tipo_producto: "DP".into(),
            numero_cuenta: String::new(),
            nombre_titular: String::new(),
            numero_documento_titular: String::new(),
            tipo_documento_titular: "CC".into(),
            numero_hijos: 0,
            edad_hijos: "0".into(),
            nombre_familiar: "NO INFO".into(),
            parentesco: "NO INFO".into(),
            telefono_familiar: String::new(),
            telefono_emergencia: String::new(),
            institucion: "NO INFO".into(),
            titulo_obtenido: "BACHILLER".into(),
            anio_culminado: String::new(),
            ultima_experiencia: "NO INFO".into(),
            estado: "Activo".into(),
            foto: String::new(),
        }
    }
}

fn date_field(name: &str, raw: &str) -> DomainResult<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::Validation(format!("Fecha inválida en {}: {}", name, raw)))?;
    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::default()));
    Ok(timestamp_value(midnight))
}

impl NewTrabajador {
    /// Document fields to create: upper-cased names, timestamp dates and the
    /// creation time under `timestamp`.
    pub fn into_fields(self, now: DateTime<Utc>) -> DomainResult<Fields> {
        if self.nombre_apellidos.trim().is_empty() || self.numero_documento.trim().is_empty() {
            return Err(DomainError::Validation(
                "Nombre y número de documento son obligatorios".to_string(),
            ));
        }

        let mut fields = match serde_json::to_value(&self) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Fields::new(),
            Err(e) => return Err(DomainError::Validation(e.to_string())),
        };
        for key in UPPERCASE_FIELDS {
            if let Some(Value::String(s)) = fields.get_mut(key) {
                *s = s.to_uppercase();
            }
        }
        for key in DATE_FIELDS {
            let raw = fields
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            fields.insert(key.to_string(), date_field(key, &raw)?);
        }
        fields.insert("timestamp".to_string(), timestamp_value(now));
        Ok(fields)
    }
}

/// Blob path for an uploaded worker photo
pub fn photo_path(now_millis: i64, file_name: &str) -> String {
    let name: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let name = if name.trim().is_empty() {
        "foto".to_string()
    } else {
        name
    };
    format!("{}/{}_{}", PHOTO_PREFIX, now_millis, name)
}
