//! Lenient field decoding for schema-less documents.
//!
//! Documents are written by several screens and by hand in the console, so a
//! numeric field may arrive as a number, a numeric string, `null` or not at
//! all. Anything that is not a finite number decodes as zero; text fields
//! accept numbers and stringify them.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Key of the JSON object that marks a timestamp field
pub const TIMESTAMP_KEY: &str = "$timestamp";

/// Coerce a JSON value to a number, zero when absent or not numeric
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return 0.0;
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .unwrap_or(0.0)
        }
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

/// Coerce a JSON value to text; `null` becomes empty
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(to_number).unwrap_or(0.0))
}

pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    number(deserializer).map(|n| n.round() as i64)
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(to_text).unwrap_or_default())
}

/// Like [`text`] but keeps absence and `null` distinct from an empty string
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(to_text(&v)),
    })
}

/// `null`, absence and wrongly-typed values all decode as `T::default()`
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

/// Date fields are plain `YYYY-MM-DD` strings on some documents and
/// timestamps on others; both decode to the calendar date.
pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Object(map)) => map
            .get(TIMESTAMP_KEY)
            .and_then(Value::as_str)
            .map(|ts| ts.chars().take(10).collect()),
        _ => None,
    })
}
