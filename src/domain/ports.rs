//! Ports to the hosted backend.
//!
//! Identity, documents and blobs live in a backend-as-a-service. The service
//! only talks to it through the three traits below; `infrastructure` provides
//! an in-memory implementation and a Firebase REST one.

use std::cmp::Ordering;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::warn;

use crate::shared::errors::InfraResult;
pub use crate::shared::lenient::TIMESTAMP_KEY;

/// Field map of a stored document
pub type Fields = Map<String, Value>;

// ── Collections ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Usuarios,
    RegistrosJornadas,
    Trabajadores,
    Dotacion,
    EntregasEpp,
    Sedes,
    Inventario,
    Rutas,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Usuarios,
        Collection::RegistrosJornadas,
        Collection::Trabajadores,
        Collection::Dotacion,
        Collection::EntregasEpp,
        Collection::Sedes,
        Collection::Inventario,
        Collection::Rutas,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Usuarios => "usuarios",
            Collection::RegistrosJornadas => "registrosJornadas",
            Collection::Trabajadores => "trabajadores",
            Collection::Dotacion => "dotacion",
            Collection::EntregasEpp => "entregasEPP",
            Collection::Sedes => "sedes",
            Collection::Inventario => "inventario",
            Collection::Rutas => "rutas",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Documents ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Fields plus the document id under `id`
    pub fn to_value(&self) -> Value {
        let mut map = self.fields.clone();
        map.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(map)
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_value())
    }
}

/// Decode every document, skipping (and logging) the ones that do not fit `T`
pub fn decode_all<T: DeserializeOwned>(collection: Collection, docs: &[Document]) -> Vec<T> {
    docs.iter()
        .filter_map(|doc| match doc.decode() {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(%collection, id = %doc.id, error = %e, "Skipping undecodable document");
                None
            }
        })
        .collect()
}

pub fn timestamp_value(at: DateTime<Utc>) -> Value {
    let mut map = Map::new();
    map.insert(
        TIMESTAMP_KEY.to_string(),
        Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Value::Object(map)
}

pub fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_object()?.get(TIMESTAMP_KEY)?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ── Ordering ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::Object(map) if map.contains_key(TIMESTAMP_KEY) => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Object(_) => 6,
    }
}

/// Value ordering of the document database: type first, then value
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Object(_), Value::Object(_)) => match (as_timestamp(a), as_timestamp(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

/// Order a snapshot like the backend query would: documents without the
/// field are left out, ties keep document-id order.
pub fn apply_order(mut docs: Vec<Document>, order: Option<&OrderBy>) -> Vec<Document> {
    let Some(order) = order else {
        return docs;
    };
    docs.retain(|d| d.fields.contains_key(&order.field));
    docs.sort_by(|a, b| {
        let (x, y) = (&a.fields[&order.field], &b.fields[&order.field]);
        let cmp = match order.direction {
            Direction::Ascending => compare_values(x, y),
            Direction::Descending => compare_values(y, x),
        };
        cmp.then_with(|| a.id.cmp(&b.id))
    });
    docs
}

// ── Live queries ───────────────────────────────────────────────

/// Live query over one collection.
///
/// The first call to [`Subscription::next`] yields the current snapshot,
/// every later call waits for the next change. Dropping the subscription
/// releases it on the backend side.
pub struct Subscription {
    receiver: watch::Receiver<Vec<Document>>,
    order: Option<OrderBy>,
    delivered_initial: bool,
}

impl Subscription {
    /// `order` is applied to every snapshot; pass `None` when the producer
    /// already emits ordered snapshots.
    pub fn new(receiver: watch::Receiver<Vec<Document>>, order: Option<OrderBy>) -> Self {
        Self {
            receiver,
            order,
            delivered_initial: false,
        }
    }

    /// Next snapshot, `None` once the producer is gone
    pub async fn next(&mut self) -> Option<Vec<Document>> {
        if self.delivered_initial {
            self.receiver.changed().await.ok()?;
        }
        self.delivered_initial = true;
        let snapshot = self.receiver.borrow_and_update().clone();
        Some(apply_order(snapshot, self.order.as_ref()))
    }
}

// ── Identity ───────────────────────────────────────────────────

/// A signed-in account at the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSession {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub signed_in_at: DateTime<Utc>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> InfraResult<ProviderSession>;

    async fn sign_out(&self, session: &ProviderSession) -> InfraResult<()>;

    /// Fails with `RecentLoginRequired` when the provider wants a fresh sign-in
    async fn update_password(&self, session: &ProviderSession, new_password: &str)
        -> InfraResult<()>;
}

// ── Documents ──────────────────────────────────────────────────

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: Collection, id: &str) -> InfraResult<Option<Document>>;

    async fn list(&self, collection: Collection, order: Option<&OrderBy>)
        -> InfraResult<Vec<Document>>;

    /// Create a document with a generated id and return the id
    async fn create(&self, collection: Collection, fields: Fields) -> InfraResult<String>;

    /// Replace the given top-level fields of an existing document
    async fn update_fields(&self, collection: Collection, id: &str, fields: Fields)
        -> InfraResult<()>;

    async fn subscribe(&self, collection: Collection, order: Option<OrderBy>)
        -> InfraResult<Subscription>;
}

// ── Blobs ──────────────────────────────────────────────────────

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path` and return a public download URL
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> InfraResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, fields: Value) -> Document {
        match fields {
            Value::Object(map) => Document::new(id, map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn collection_names_round_trip() {
        for c in Collection::ALL {
            assert_eq!(Collection::from_name(c.name()), Some(c));
        }
        assert_eq!(Collection::EntregasEpp.name(), "entregasEPP");
        assert_eq!(Collection::from_name("nope"), None);
    }

    #[test]
    fn decode_injects_id() {
        #[derive(serde::Deserialize)]
        struct Named {
            id: String,
            nombre: String,
        }
        let named: Named = doc("abc", json!({"nombre": "Ana"})).decode().unwrap();
        assert_eq!(named.id, "abc");
        assert_eq!(named.nombre, "Ana");
    }

    #[test]
    fn order_drops_missing_field_and_sorts() {
        let docs = vec![
            doc("1", json!({"n": "carlos"})),
            doc("2", json!({})),
            doc("3", json!({"n": "ana"})),
        ];
        let ordered = apply_order(docs.clone(), Some(&OrderBy::asc("n")));
        let ids: Vec<_> = ordered.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["3", "1"]);

        let ordered = apply_order(docs, Some(&OrderBy::desc("n")));
        assert_eq!(ordered[0].id, "1");
    }

    #[test]
    fn numbers_sort_before_strings() {
        assert_eq!(compare_values(&json!(100), &json!("1")), Ordering::Less);
        assert_eq!(compare_values(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_values(&Value::Null, &json!(false)), Ordering::Less);
    }

    #[test]
    fn timestamps_round_trip() {
        let at = DateTime::parse_from_rfc3339("2024-06-10T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let value = timestamp_value(at);
        assert_eq!(value, json!({"$timestamp": "2024-06-10T12:30:00.000Z"}));
        assert_eq!(as_timestamp(&value), Some(at));
        assert_eq!(as_timestamp(&json!("2024-06-10")), None);
    }

    #[tokio::test]
    async fn subscription_yields_initial_then_changes() {
        let (tx, rx) = watch::channel(vec![doc("1", json!({"n": 1}))]);
        let mut sub = Subscription::new(rx, None);

        assert_eq!(sub.next().await.unwrap().len(), 1);

        tx.send_replace(vec![doc("1", json!({"n": 1})), doc("2", json!({"n": 2}))]);
        assert_eq!(sub.next().await.unwrap().len(), 2);

        drop(tx);
        assert!(sub.next().await.is_none());
    }
}
