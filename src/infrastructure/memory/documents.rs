//! In-memory document store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    apply_order, Collection, Document, DocumentStore, Fields, OrderBy, Subscription,
};
use crate::shared::errors::{InfraError, InfraResult};

struct CollectionState {
    docs: BTreeMap<String, Fields>,
    sender: watch::Sender<Vec<Document>>,
}

impl CollectionState {
    fn new() -> Self {
        let (sender, _) = watch::channel(Vec::new());
        Self {
            docs: BTreeMap::new(),
            sender,
        }
    }

    fn snapshot(&self) -> Vec<Document> {
        self.docs
            .iter()
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .collect()
    }

    /// Push the new snapshot to every live query
    fn publish(&self) {
        self.sender.send_replace(self.snapshot());
    }
}

/// Document store kept in process memory.
///
/// Live queries are backed by one `watch` channel per collection, so a
/// subscriber always sees the latest snapshot and dropping it is enough to
/// release it.
pub struct InMemoryDocumentStore {
    collections: DashMap<Collection, CollectionState>,
    fail_writes: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Insert or replace a document with a known id
    pub fn insert(&self, collection: Collection, id: impl Into<String>, fields: Fields) {
        let mut state = self
            .collections
            .entry(collection)
            .or_insert_with(CollectionState::new);
        state.docs.insert(id.into(), fields);
        state.publish();
    }

    /// Number of live queries currently open on `collection`
    pub fn subscriber_count(&self, collection: Collection) -> usize {
        self.collections
            .get(&collection)
            .map(|state| state.sender.receiver_count())
            .unwrap_or(0)
    }

    /// Make every write fail, to exercise error paths
    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    fn check_writable(&self) -> InfraResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(InfraError::Backend("writes are disabled".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> InfraResult<Option<Document>> {
        Ok(self.collections.get(&collection).and_then(|state| {
            state
                .docs
                .get(id)
                .map(|fields| Document::new(id, fields.clone()))
        }))
    }

    async fn list(
        &self,
        collection: Collection,
        order: Option<&OrderBy>,
    ) -> InfraResult<Vec<Document>> {
        let docs = self
            .collections
            .get(&collection)
            .map(|state| state.snapshot())
            .unwrap_or_default();
        Ok(apply_order(docs, order))
    }

    async fn create(&self, collection: Collection, fields: Fields) -> InfraResult<String> {
        self.check_writable()?;
        let id = Uuid::new_v4().simple().to_string();
        self.insert(collection, id.clone(), fields);
        debug!(%collection, %id, "Document created");
        Ok(id)
    }

    async fn update_fields(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> InfraResult<()> {
        self.check_writable()?;
        let mut state = self
            .collections
            .get_mut(&collection)
            .ok_or_else(|| InfraError::Backend(format!("No document to update: {}/{}", collection, id)))?;
        let doc = state
            .docs
            .get_mut(id)
            .ok_or_else(|| InfraError::Backend(format!("No document to update: {}/{}", collection, id)))?;
        doc.extend(fields);
        state.publish();
        debug!(%collection, %id, "Document updated");
        Ok(())
    }

    async fn subscribe(
        &self,
        collection: Collection,
        order: Option<OrderBy>,
    ) -> InfraResult<Subscription> {
        let state = self
            .collections
            .entry(collection)
            .or_insert_with(CollectionState::new);
        let receiver = state.sender.subscribe();
        debug!(%collection, subscribers = state.sender.receiver_count(), "Live query opened");
        Ok(Subscription::new(receiver, order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[tokio::test]
    async fn create_then_get_and_list() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .create(Collection::Sedes, fields(json!({"Cliente": "Clinica"})))
            .await
            .unwrap();

        let doc = store.get(Collection::Sedes, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["Cliente"], json!("Clinica"));
        assert_eq!(store.list(Collection::Sedes, None).await.unwrap().len(), 1);
        assert!(store.get(Collection::Rutas, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_replaces_only_given_fields() {
        let store = InMemoryDocumentStore::new();
        store.insert(
            Collection::Usuarios,
            "u1",
            fields(json!({"nombre": "Ana", "rol": "Admin"})),
        );
        store
            .update_fields(Collection::Usuarios, "u1", fields(json!({"nombre": "Ana R"})))
            .await
            .unwrap();

        let doc = store.get(Collection::Usuarios, "u1").await.unwrap().unwrap();
        assert_eq!(doc.fields["nombre"], json!("Ana R"));
        assert_eq!(doc.fields["rol"], json!("Admin"));

        let missing = store
            .update_fields(Collection::Usuarios, "nope", Fields::new())
            .await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn list_honours_order() {
        let store = InMemoryDocumentStore::new();
        store.insert(Collection::RegistrosJornadas, "a", fields(json!({"fecha": "2024-06-02"})));
        store.insert(Collection::RegistrosJornadas, "b", fields(json!({"fecha": "2024-06-03"})));
        store.insert(Collection::RegistrosJornadas, "c", fields(json!({"fecha": "2024-06-01"})));

        let docs = store
            .list(Collection::RegistrosJornadas, Some(&OrderBy::desc("fecha")))
            .await
            .unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn subscription_sees_initial_snapshot_and_changes() {
        let store = InMemoryDocumentStore::new();
        store.insert(Collection::Dotacion, "s1", fields(json!({"tipo": "Botas"})));

        let mut sub = store.subscribe(Collection::Dotacion, None).await.unwrap();
        assert_eq!(sub.next().await.unwrap().len(), 1);

        store
            .create(Collection::Dotacion, fields(json!({"tipo": "Casco"})))
            .await
            .unwrap();
        let next = tokio::time::timeout(Duration::from_secs(1), sub.next())
            .await
            .expect("change should be delivered")
            .unwrap();
        assert_eq!(next.len(), 2);
    }

    #[tokio::test]
    async fn dropping_subscription_releases_it() {
        let store = InMemoryDocumentStore::new();
        let first = store.subscribe(Collection::Trabajadores, None).await.unwrap();
        let second = store.subscribe(Collection::Trabajadores, None).await.unwrap();
        assert_eq!(store.subscriber_count(Collection::Trabajadores), 2);

        drop(first);
        assert_eq!(store.subscriber_count(Collection::Trabajadores), 1);
        drop(second);
        assert_eq!(store.subscriber_count(Collection::Trabajadores), 0);
    }

    #[tokio::test]
    async fn failing_writes_surface_as_backend_errors() {
        let store = InMemoryDocumentStore::new();
        store.fail_writes(true);
        let result = store.create(Collection::Trabajadores, Fields::new()).await;
        assert!(matches!(result, Err(InfraError::Backend(_))));
    }
}
