use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::load;
use crate::domain::ports::{decode_all, Collection, Document, DocumentStore};
use crate::domain::sede::{apply_rate_edits, search_sedes, RateEdit, Sede};
use crate::shared::errors::{messages, DomainError, DomainResult};

const CENTRO_COSTO: &str = "CentroCosto";

pub struct SedesService {
    documents: Arc<dyn DocumentStore>,
}

impl SedesService {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    pub async fn list(&self, search: &str) -> Vec<Sede> {
        let docs = load(self.documents.as_ref(), Collection::Sedes, None).await;
        project_sedes(&docs, search)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Sede> {
        let doc = self.document(id).await?;
        doc.decode()
            .map_err(|e| DomainError::Validation(format!("Sede ilegible: {}", e)))
    }

    /// Apply rate edits and write the whole `CentroCosto` array back.
    ///
    /// No concurrency check: the last save wins.
    pub async fn save_rates(&self, id: &str, edits: &[RateEdit]) -> DomainResult<Sede> {
        let mut doc = self.document(id).await?;
        let current = doc.fields.get(CENTRO_COSTO).cloned().unwrap_or(Value::Null);
        let updated = apply_rate_edits(&current, edits)?;

        let mut fields = Map::new();
        fields.insert(CENTRO_COSTO.to_string(), updated.clone());
        self.documents
            .update_fields(Collection::Sedes, id, fields)
            .await
            .map_err(|e| {
                warn!(%id, error = %e, "Rate save failed");
                DomainError::WriteFailed(messages::SAVE_FAILED)
            })?;
        info!(%id, edits = edits.len(), "Rates saved");

        doc.fields.insert(CENTRO_COSTO.to_string(), updated);
        doc.decode()
            .map_err(|e| DomainError::Validation(format!("Sede ilegible: {}", e)))
    }

    async fn document(&self, id: &str) -> DomainResult<Document> {
        match self.documents.get(Collection::Sedes, id).await {
            Ok(Some(doc)) => Ok(doc),
            Ok(None) => Err(DomainError::not_found("Sede", id)),
            Err(e) => {
                warn!(%id, error = %e, "Sede lookup failed");
                Err(DomainError::Unavailable)
            }
        }
    }
}

pub fn project_sedes(docs: &[Document], search: &str) -> Vec<Sede> {
    let sedes: Vec<Sede> = decode_all(Collection::Sedes, docs);
    search_sedes(&sedes, search)
}
