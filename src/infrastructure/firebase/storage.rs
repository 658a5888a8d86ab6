//! Firebase Storage upload adapter

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::Deserialize;
use tracing::info;

use super::client::{error_code, url_with_segments, FirebaseClient};
use crate::domain::ports::BlobStore;
use crate::shared::errors::{InfraError, InfraResult};

const STORAGE_BASE: &str = "https://firebasestorage.googleapis.com/v0/b";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

pub struct FirebaseBlobStore {
    client: Arc<FirebaseClient>,
}

impl FirebaseBlobStore {
    pub fn new(client: Arc<FirebaseClient>) -> Self {
        Self { client }
    }

    fn bucket(&self) -> &str {
        &self.client.config().storage_bucket
    }
}

/// Public download URL of an uploaded object
fn download_url(bucket: &str, path: &str, token: Option<&str>) -> InfraResult<Url> {
    let mut url = url_with_segments(STORAGE_BASE, &[bucket, "o", path])?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("alt", "media");
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            // Several tokens may be present; any of them works
            let first = token.split(',').next().unwrap_or(token);
            query.append_pair("token", first);
        }
    }
    Ok(url)
}

#[async_trait]
impl BlobStore for FirebaseBlobStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> InfraResult<String> {
        let url = url_with_segments(STORAGE_BASE, &[self.bucket(), "o"])?;
        let size = bytes.len();
        let response = self
            .client
            .authorize(self.client.http().post(url))
            .query(&[("uploadType", "media"), ("name", path)])
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(InfraError::Upload(error_code(response).await));
        }

        let uploaded: UploadResponse = response.json().await?;
        let url = download_url(
            self.bucket(),
            &uploaded.name,
            uploaded.download_tokens.as_deref(),
        )?;
        info!(path = %uploaded.name, size, "Blob uploaded");
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_url_escapes_object_path() {
        let url = download_url("ama.appspot.com", "fotos_personal/17_yo.png", Some("abc,def"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://firebasestorage.googleapis.com/v0/b/ama.appspot.com/o/fotos_personal%2F17_yo.png?alt=media&token=abc"
        );
    }

    #[test]
    fn download_url_without_token() {
        let url = download_url("b", "x.png", None).unwrap();
        assert!(url.as_str().ends_with("/o/x.png?alt=media"));
    }
}
