//! Infrastructure layer: backend adapters and crypto

pub mod crypto;
pub mod firebase;
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{AppConfig, BackendKind, FirebaseConfig, LiveConfig, MemoryConfig};
use crate::domain::ports::{BlobStore, DocumentStore, IdentityProvider};
use crate::shared::errors::{InfraError, InfraResult};

use firebase::{FirebaseBlobStore, FirebaseClient, FirestoreDocumentStore, FirebaseIdentityProvider};
use memory::{InMemoryBlobStore, InMemoryDocumentStore, InMemoryIdentityProvider, SeedFile};

/// The three backend ports, shared by every service
#[derive(Clone)]
pub struct Backend {
    pub identity: Arc<dyn IdentityProvider>,
    pub documents: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl Backend {
    pub fn from_config(config: &AppConfig) -> InfraResult<Self> {
        match config.backend.kind {
            BackendKind::Memory => Ok(MemoryBackend::from_config(&config.backend.memory)?.backend()),
            BackendKind::Firebase => Self::firebase(&config.backend.firebase, &config.live),
        }
    }

    pub fn firebase(config: &FirebaseConfig, live: &LiveConfig) -> InfraResult<Self> {
        if config.api_key.is_empty() || config.project_id.is_empty() {
            return Err(InfraError::Backend(
                "backend.firebase.api_key and project_id are required".to_string(),
            ));
        }
        let client = Arc::new(FirebaseClient::new(config.clone())?);
        info!(project = %config.project_id, "Using Firebase backend");
        Ok(Self {
            identity: Arc::new(FirebaseIdentityProvider::new(client.clone())),
            documents: Arc::new(FirestoreDocumentStore::new(
                client.clone(),
                Duration::from_millis(live.poll_interval_ms.max(100)),
            )),
            blobs: Arc::new(FirebaseBlobStore::new(client)),
        })
    }
}

/// In-memory backend with typed handles, used for local runs and tests
#[derive(Clone)]
pub struct MemoryBackend {
    pub identity: Arc<InMemoryIdentityProvider>,
    pub documents: Arc<InMemoryDocumentStore>,
    pub blobs: Arc<InMemoryBlobStore>,
}

impl MemoryBackend {
    pub fn new(bucket: &str) -> Self {
        Self {
            identity: Arc::new(InMemoryIdentityProvider::new()),
            documents: Arc::new(InMemoryDocumentStore::new()),
            blobs: Arc::new(InMemoryBlobStore::new(bucket)),
        }
    }

    pub fn from_config(config: &MemoryConfig) -> InfraResult<Self> {
        let backend = Self::new(&config.bucket);
        if let Some(path) = &config.seed_file {
            SeedFile::load(path)?.apply(&backend.identity, &backend.documents);
            info!(seed = %path.display(), "In-memory backend seeded");
        } else {
            info!("Using empty in-memory backend");
        }
        Ok(backend)
    }

    pub fn backend(&self) -> Backend {
        Backend {
            identity: self.identity.clone(),
            documents: self.documents.clone(),
            blobs: self.blobs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firebase_requires_project_settings() {
        let result = Backend::firebase(&FirebaseConfig::default(), &LiveConfig::default());
        assert!(matches!(result, Err(InfraError::Backend(_))));
    }

    #[test]
    fn missing_seed_file_is_an_error() {
        let config = MemoryConfig {
            seed_file: Some("/nonexistent/seed.json".into()),
            ..MemoryConfig::default()
        };
        assert!(MemoryBackend::from_config(&config).is_err());
    }
}
