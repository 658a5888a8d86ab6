//! Identity Toolkit adapter

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::client::{error_code, FirebaseClient};
use crate::domain::ports::{IdentityProvider, ProviderSession};
use crate::shared::errors::{InfraError, InfraResult};

const IDENTITY_BASE: &str = "https://identitytoolkit.googleapis.com/v1";

/// Error codes that mean "wrong email or password"
const CREDENTIAL_ERRORS: [&str; 7] = [
    "INVALID_LOGIN_CREDENTIALS",
    "EMAIL_NOT_FOUND",
    "INVALID_PASSWORD",
    "INVALID_EMAIL",
    "MISSING_PASSWORD",
    "USER_DISABLED",
    "TOO_MANY_ATTEMPTS_TRY_LATER",
];

/// Error codes that require the user to sign in again
const STALE_ERRORS: [&str; 4] = [
    "CREDENTIAL_TOO_OLD_LOGIN_AGAIN",
    "TOKEN_EXPIRED",
    "INVALID_ID_TOKEN",
    "USER_NOT_FOUND",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: String,
    id_token: String,
}

pub struct FirebaseIdentityProvider {
    client: Arc<FirebaseClient>,
}

impl FirebaseIdentityProvider {
    pub fn new(client: Arc<FirebaseClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> InfraResult<ProviderSession> {
        let response = self
            .client
            .http()
            .post(format!("{}/accounts:signInWithPassword", IDENTITY_BASE))
            .query(&[("key", self.client.config().api_key.as_str())])
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let code = error_code(response).await;
            if CREDENTIAL_ERRORS.contains(&code.as_str()) {
                debug!(%code, "Sign-in rejected");
                return Err(InfraError::InvalidCredentials);
            }
            warn!(%code, "Identity provider error on sign-in");
            return Err(InfraError::Backend(code));
        }

        let body: SignInResponse = response.json().await?;
        Ok(ProviderSession {
            uid: body.local_id,
            email: body.email,
            id_token: body.id_token,
            signed_in_at: Utc::now(),
        })
    }

    async fn sign_out(&self, session: &ProviderSession) -> InfraResult<()> {
        // ID tokens are stateless; dropping ours is all a sign-out takes
        debug!(uid = %session.uid, "Provider session released");
        Ok(())
    }

    async fn update_password(
        &self,
        session: &ProviderSession,
        new_password: &str,
    ) -> InfraResult<()> {
        let response = self
            .client
            .http()
            .post(format!("{}/accounts:update", IDENTITY_BASE))
            .query(&[("key", self.client.config().api_key.as_str())])
            .json(&json!({
                "idToken": session.id_token,
                "password": new_password,
                "returnSecureToken": false,
            }))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }
        let code = error_code(response).await;
        if STALE_ERRORS.contains(&code.as_str()) {
            return Err(InfraError::RecentLoginRequired);
        }
        Err(InfraError::Backend(code))
    }
}
