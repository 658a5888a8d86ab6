//! Firestore typed-value codec.
//!
//! The REST API wraps every value in a single-key object naming its type
//! (`{"stringValue": "x"}`, `{"integerValue": "3"}`, ...). Inside the service
//! documents are plain JSON, with timestamps as `{"$timestamp": rfc3339}`.

use serde_json::{Map, Number, Value};

use crate::domain::ports::{Document, Fields, TIMESTAMP_KEY};
use crate::shared::errors::{InfraError, InfraResult};

pub fn encode_value(value: &Value) -> Value {
    let mut typed = Map::new();
    match value {
        Value::Null => {
            typed.insert("nullValue".into(), Value::Null);
        }
        Value::Bool(b) => {
            typed.insert("booleanValue".into(), Value::Bool(*b));
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                typed.insert("integerValue".into(), Value::String(i.to_string()));
            } else {
                typed.insert("doubleValue".into(), Value::Number(n.clone()));
            }
        }
        Value::String(s) => {
            typed.insert("stringValue".into(), Value::String(s.clone()));
        }
        Value::Array(items) => {
            let values = items.iter().map(encode_value).collect();
            let mut array = Map::new();
            array.insert("values".into(), Value::Array(values));
            typed.insert("arrayValue".into(), Value::Object(array));
        }
        Value::Object(map) => match timestamp_of(map) {
            Some(ts) => {
                typed.insert("timestampValue".into(), Value::String(ts.to_string()));
            }
            None => {
                let mut inner = Map::new();
                inner.insert("fields".into(), Value::Object(encode_fields(map)));
                typed.insert("mapValue".into(), Value::Object(inner));
            }
        },
    }
    Value::Object(typed)
}

fn timestamp_of(map: &Map<String, Value>) -> Option<&str> {
    if map.len() != 1 {
        return None;
    }
    map.get(TIMESTAMP_KEY).and_then(Value::as_str)
}

pub fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

/// Decode a typed value; unknown shapes decode as `null`
pub fn decode_value(typed: &Value) -> Value {
    let Some((kind, inner)) = typed.as_object().and_then(|m| m.iter().next()) else {
        return Value::Null;
    };
    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => inner.as_bool().map(Value::Bool).unwrap_or(Value::Null),
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Number(n) => Value::Number(n.clone()),
            _ => Value::Null,
        },
        "doubleValue" => match inner {
            Value::Number(n) => Value::Number(n.clone()),
            // NaN and infinities arrive as strings and have no JSON form
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            _ => Value::Null,
        },
        "stringValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "timestampValue" => {
            let mut map = Map::new();
            map.insert(TIMESTAMP_KEY.into(), inner.clone());
            Value::Object(map)
        }
        "geoPointValue" => inner.clone(),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        _ => Value::Null,
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Fields {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

/// Decode a REST document resource (`{"name": ".../docs/<id>", "fields": {...}}`)
pub fn decode_document(resource: &Value) -> InfraResult<Document> {
    let name = resource
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| InfraError::Backend("Document without name".to_string()))?;
    let id = name.rsplit('/').next().unwrap_or(name);
    let fields = resource
        .get("fields")
        .and_then(Value::as_object)
        .map(decode_fields)
        .unwrap_or_default();
    Ok(Document::new(id, fields))
}
