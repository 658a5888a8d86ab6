//! Shared HTTP client for the Firebase REST endpoints

use std::time::Duration;

use reqwest::{RequestBuilder, Response, Url};
use serde_json::Value;

use crate::config::FirebaseConfig;
use crate::shared::errors::{InfraError, InfraResult};

pub struct FirebaseClient {
    http: reqwest::Client,
    config: FirebaseConfig,
}

impl FirebaseClient {
    pub fn new(config: FirebaseConfig) -> InfraResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn config(&self) -> &FirebaseConfig {
        &self.config
    }

    /// Attach the API key and, when configured, the service access token
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.query(&[("key", self.config.api_key.as_str())]);
        match self.config.access_token.as_deref() {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        }
    }
}

/// Parse `base` and append `segments` as escaped path segments
pub fn url_with_segments(base: &str, segments: &[&str]) -> InfraResult<Url> {
    let mut url = Url::parse(base).map_err(|e| InfraError::Backend(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| InfraError::Backend(format!("Cannot extend URL {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Error code reported by a Google API error body.
///
/// Identity Toolkit answers `{"error": {"message": "EMAIL_NOT_FOUND"}}`,
/// sometimes with a ` : detail` suffix.
pub async fn error_code(response: Response) -> String {
    let status = response.status();
    let body: Option<Value> = response.json().await.ok();
    body.as_ref()
        .and_then(|b| b.get("error"))
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(|m| m.split(" : ").next().unwrap_or(m).trim().to_string())
        .unwrap_or_else(|| status.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_escaped() {
        let url = url_with_segments(
            "https://firebasestorage.googleapis.com/v0/b",
            &["bucket", "o", "fotos_personal/1_a b.png"],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://firebasestorage.googleapis.com/v0/b/bucket/o/fotos_personal%2F1_a%20b.png"
        );
    }
}
