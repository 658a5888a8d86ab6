//! In-memory blob store

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::ports::BlobStore;
use crate::shared::errors::{InfraError, InfraResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub struct InMemoryBlobStore {
    bucket: String,
    blobs: DashMap<String, StoredBlob>,
    fail_uploads: AtomicBool,
}

impl InMemoryBlobStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            blobs: DashMap::new(),
            fail_uploads: AtomicBool::new(false),
        }
    }

    pub fn get(&self, path: &str) -> Option<StoredBlob> {
        self.blobs.get(path).map(|b| b.clone())
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Make every upload fail, to exercise error paths
    pub fn fail_uploads(&self, on: bool) {
        self.fail_uploads.store(on, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> InfraResult<String> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(InfraError::Upload("uploads are disabled".to_string()));
        }
        self.blobs.insert(
            path.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{}/{}", self.bucket, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_returns_url_and_keeps_bytes() {
        let store = InMemoryBlobStore::new("ama-local");
        let url = store
            .upload("fotos_personal/1_a.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(url, "memory://ama-local/fotos_personal/1_a.png");
        let blob = store.get("fotos_personal/1_a.png").unwrap();
        assert_eq!(blob.bytes, [1, 2, 3]);
        assert_eq!(blob.content_type, "image/png");
    }
}
