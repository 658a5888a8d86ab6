use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::load;
use crate::application::media::content_type_for;
use crate::domain::ports::{decode_all, BlobStore, Collection, Document, DocumentStore, OrderBy};
use crate::domain::trabajador::{filter_roster, photo_path, NewTrabajador, RosterQuery, Trabajador};
use crate::shared::errors::{messages, DomainError, DomainResult};

pub struct PersonalService {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl PersonalService {
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { documents, blobs }
    }

    pub fn source() -> (Collection, Option<OrderBy>) {
        (Collection::Trabajadores, Some(OrderBy::asc("nombreApellidos")))
    }

    pub async fn roster(&self, query: &RosterQuery) -> Vec<Trabajador> {
        let (collection, order) = Self::source();
        let docs = load(self.documents.as_ref(), collection, order.as_ref()).await;
        project_roster(&docs, query)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Trabajador> {
        let doc = match self.documents.get(Collection::Trabajadores, id).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!(%id, error = %e, "Worker lookup failed");
                return Err(DomainError::Unavailable);
            }
        };
        doc.and_then(|d| d.decode().ok())
            .ok_or_else(|| DomainError::not_found("Trabajador", id))
    }

    /// Store a new worker and return its id
    pub async fn create(&self, form: NewTrabajador) -> DomainResult<String> {
        let fields = form.into_fields(Utc::now())?;
        let id = self
            .documents
            .create(Collection::Trabajadores, fields)
            .await
            .map_err(|e| {
                warn!(error = %e, "Worker create failed");
                DomainError::WriteFailed(messages::SAVE_FAILED)
            })?;
        info!(%id, "Worker created");
        Ok(id)
    }

    /// Upload a worker photo and return its download URL
    pub async fn upload_photo(&self, file_name: &str, bytes: Vec<u8>) -> DomainResult<String> {
        let path = photo_path(Utc::now().timestamp_millis(), file_name);
        let content_type = content_type_for(file_name);
        self.blobs
            .upload(&path, bytes, &content_type)
            .await
            .map_err(|e| {
                warn!(%path, error = %e, "Worker photo upload failed");
                DomainError::UploadFailed
            })
    }
}

pub fn project_roster(docs: &[Document], query: &RosterQuery) -> Vec<Trabajador> {
    let roster: Vec<Trabajador> = decode_all(Collection::Trabajadores, docs);
    filter_roster(&roster, query)
}
