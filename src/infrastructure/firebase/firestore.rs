//! Firestore REST adapter.
//!
//! Live queries are emulated by polling `runQuery`; a snapshot is only
//! published when it differs from the previous one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::client::{error_code, url_with_segments, FirebaseClient};
use super::value::{decode_document, encode_fields};
use crate::domain::ports::{
    Collection, Direction, Document, DocumentStore, Fields, OrderBy, Subscription,
};
use crate::shared::errors::{InfraError, InfraResult};

#[derive(Clone)]
pub struct FirestoreDocumentStore {
    client: Arc<FirebaseClient>,
    poll_interval: Duration,
}

impl FirestoreDocumentStore {
    pub fn new(client: Arc<FirebaseClient>, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }

    fn documents_root(&self) -> String {
        format!(
            "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents",
            self.client.config().project_id
        )
    }

    async fn run_query(
        &self,
        collection: Collection,
        order: Option<&OrderBy>,
    ) -> InfraResult<Vec<Document>> {
        let response = self
            .client
            .authorize(
                self.client
                    .http()
                    .post(format!("{}:runQuery", self.documents_root())),
            )
            .json(&run_query_body(collection, order))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(InfraError::Backend(error_code(response).await));
        }

        // One entry per result; entries without `document` only carry read metadata
        let entries: Vec<Value> = response.json().await?;
        entries
            .iter()
            .filter_map(|entry| entry.get("document"))
            .map(decode_document)
            .collect()
    }

    /// Poll until every subscriber is gone
    async fn poll(
        self,
        collection: Collection,
        order: Option<OrderBy>,
        sender: watch::Sender<Vec<Document>>,
    ) {
        loop {
            tokio::select! {
                _ = sender.closed() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
            match self.run_query(collection, order.as_ref()).await {
                Ok(docs) => {
                    sender.send_if_modified(|current| {
                        if *current == docs {
                            return false;
                        }
                        *current = docs;
                        true
                    });
                }
                Err(e) => warn!(%collection, error = %e, "Live query poll failed"),
            }
        }
        debug!(%collection, "Live query released");
    }
}

fn run_query_body(collection: Collection, order: Option<&OrderBy>) -> Value {
    let mut query = json!({
        "from": [{ "collectionId": collection.name() }],
    });
    if let Some(order) = order {
        let direction = match order.direction {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        };
        query["orderBy"] = json!([{
            "field": { "fieldPath": field_path(&order.field) },
            "direction": direction,
        }]);
    }
    json!({ "structuredQuery": query })
}

/// Field names outside `[A-Za-z_][A-Za-z0-9_]*` must be backquoted
fn field_path(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> InfraResult<Option<Document>> {
        let url = url_with_segments(&self.documents_root(), &[collection.name(), id])?;
        let response = self
            .client
            .authorize(self.client.http().get(url))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(InfraError::Backend(error_code(response).await));
        }
        let resource: Value = response.json().await?;
        decode_document(&resource).map(Some)
    }

    async fn list(
        &self,
        collection: Collection,
        order: Option<&OrderBy>,
    ) -> InfraResult<Vec<Document>> {
        self.run_query(collection, order).await
    }

    async fn create(&self, collection: Collection, fields: Fields) -> InfraResult<String> {
        let url = url_with_segments(&self.documents_root(), &[collection.name()])?;
        let response = self
            .client
            .authorize(self.client.http().post(url))
            .json(&json!({ "fields": encode_fields(&fields) }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(InfraError::Backend(error_code(response).await));
        }
        let resource: Value = response.json().await?;
        let id = decode_document(&resource)?.id;
        debug!(%collection, %id, "Document created");
        Ok(id)
    }

    async fn update_fields(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> InfraResult<()> {
        let url = url_with_segments(&self.documents_root(), &[collection.name(), id])?;
        let mut request = self
            .client
            .authorize(self.client.http().patch(url))
            .query(&[("currentDocument.exists", "true")]);
        for name in fields.keys() {
            request = request.query(&[("updateMask.fieldPaths", field_path(name))]);
        }
        let response = request
            .json(&json!({ "fields": encode_fields(&fields) }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(InfraError::Backend(error_code(response).await));
        }
        Ok(())
    }

    async fn subscribe(
        &self,
        collection: Collection,
        order: Option<OrderBy>,
    ) -> InfraResult<Subscription> {
        let initial = self.run_query(collection, order.as_ref()).await?;
        let (sender, receiver) = watch::channel(initial);
        tokio::spawn(self.clone().poll(collection, order, sender));
        Ok(Subscription::new(receiver, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_body_carries_collection_and_order() {
        let body = run_query_body(Collection::RegistrosJornadas, Some(&OrderBy::desc("fecha")));
        assert_eq!(
            body,
            json!({
                "structuredQuery": {
                    "from": [{ "collectionId": "registrosJornadas" }],
                    "orderBy": [{
                        "field": { "fieldPath": "fecha" },
                        "direction": "DESCENDING",
                    }],
                }
            })
        );
    }

    #[test]
    fn unordered_query_has_no_order_clause() {
        let body = run_query_body(Collection::Sedes, None);
        assert!(body["structuredQuery"].get("orderBy").is_none());
    }

    #[test]
    fn unusual_field_names_are_quoted() {
        assert_eq!(field_path("CentroCosto"), "CentroCosto");
        assert_eq!(field_path("_x1"), "_x1");
        assert_eq!(field_path("1abc"), "`1abc`");
        assert_eq!(field_path("fecha entrega"), "`fecha entrega`");
    }
}
