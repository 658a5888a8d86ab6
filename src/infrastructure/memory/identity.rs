//! In-memory identity provider

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{IdentityProvider, ProviderSession};
use crate::shared::errors::{InfraError, InfraResult};

struct Account {
    uid: String,
    password: String,
}

/// Email/password accounts kept in process memory. Emails are matched
/// case-insensitively, like the hosted provider does.
pub struct InMemoryIdentityProvider {
    accounts: DashMap<String, Account>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    pub fn add_account(&self, email: &str, password: &str, uid: &str) {
        self.accounts.insert(
            email.to_lowercase(),
            Account {
                uid: uid.to_string(),
                password: password.to_string(),
            },
        );
    }

    pub fn check_password(&self, email: &str, password: &str) -> bool {
        self.accounts
            .get(&email.to_lowercase())
            .map(|a| a.password == password)
            .unwrap_or(false)
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> InfraResult<ProviderSession> {
        let key = email.to_lowercase();
        let account = self
            .accounts
            .get(&key)
            .filter(|a| a.password == password)
            .ok_or(InfraError::InvalidCredentials)?;

        Ok(ProviderSession {
            uid: account.uid.clone(),
            email: key,
            id_token: Uuid::new_v4().to_string(),
            signed_in_at: Utc::now(),
        })
    }

    async fn sign_out(&self, session: &ProviderSession) -> InfraResult<()> {
        debug!(uid = %session.uid, "Provider session closed");
        Ok(())
    }

    async fn update_password(
        &self,
        session: &ProviderSession,
        new_password: &str,
    ) -> InfraResult<()> {
        let mut account = self
            .accounts
            .get_mut(&session.email.to_lowercase())
            .ok_or_else(|| InfraError::Backend(format!("Unknown account {}", session.email)))?;
        account.password = new_password.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_in_checks_password() {
        let idp = InMemoryIdentityProvider::new();
        idp.add_account("Ana@AMA.co", "secreto", "u1");

        let session = idp.sign_in("ana@ama.co", "secreto").await.unwrap();
        assert_eq!(session.uid, "u1");
        assert!(matches!(
            idp.sign_in("ana@ama.co", "otro").await,
            Err(InfraError::InvalidCredentials)
        ));
        assert!(matches!(
            idp.sign_in("nadie@ama.co", "secreto").await,
            Err(InfraError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn password_update_takes_effect() {
        let idp = InMemoryIdentityProvider::new();
        idp.add_account("ana@ama.co", "secreto", "u1");
        let session = idp.sign_in("ana@ama.co", "secreto").await.unwrap();

        idp.update_password(&session, "nuevo123").await.unwrap();
        assert!(idp.check_password("ana@ama.co", "nuevo123"));
        assert!(!idp.check_password("ana@ama.co", "secreto"));
    }
}
