//! Authentication and account settings.
//!
//! Sign-in goes to the identity provider; the account must also have a
//! profile document in `usuarios/{uid}` or it is signed out again.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use super::session::{SharedSessionRegistry, UserSession};
use crate::application::media::{is_data_url, parse_data_url};
use crate::domain::ports::{BlobStore, Collection, DocumentStore, IdentityProvider};
use crate::domain::UserProfile;
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig, TokenClaims};
use crate::shared::errors::{messages, DomainError, DomainResult, InfraError};

/// Folder for account profile photos
pub const PROFILE_PHOTO_PREFIX: &str = "fotos_usuarios";

pub const MIN_PASSWORD_LEN: usize = 6;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub uid: String,
    pub email: String,
    pub profile: UserProfile,
}

/// Signed-in account as the UI sees it
#[derive(Debug, Clone)]
pub struct Account {
    pub uid: String,
    pub email: String,
    pub profile: UserProfile,
}

pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    sessions: SharedSessionRegistry,
    jwt_config: JwtConfig,
    recent_login: Duration,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        sessions: SharedSessionRegistry,
        jwt_config: JwtConfig,
        recent_login_minutes: i64,
    ) -> Self {
        Self {
            identity,
            documents,
            blobs,
            sessions,
            jwt_config,
            recent_login: Duration::minutes(recent_login_minutes),
        }
    }

    pub fn sessions(&self) -> &SharedSessionRegistry {
        &self.sessions
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Authentication ──────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let email = email.trim();
        let provider = match self.identity.sign_in(email, password).await {
            Ok(session) => session,
            Err(InfraError::InvalidCredentials) => {
                return Err(DomainError::Unauthorized(messages::INVALID_CREDENTIALS.into()))
            }
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                return Err(DomainError::Unauthorized(messages::INVALID_CREDENTIALS.into()));
            }
        };

        let profile = match self.load_profile(&provider.uid).await {
            Some(profile) => profile,
            None => {
                if let Err(e) = self.identity.sign_out(&provider).await {
                    warn!(uid = %provider.uid, error = %e, "Sign-out after rejected login failed");
                }
                info!(uid = %provider.uid, "Login rejected: no profile document");
                return Err(DomainError::Unauthorized(messages::NOT_AUTHORIZED.into()));
            }
        };

        let session_id = Uuid::new_v4().to_string();
        let claims = TokenClaims::new(
            &provider.uid,
            &provider.email,
            &profile.rol,
            profile.modulos.clone(),
            &session_id,
            &self.jwt_config,
        );
        let token = create_token(&claims, &self.jwt_config)
            .map_err(|e| DomainError::Validation(format!("Failed to create token: {}", e)))?;

        info!(uid = %provider.uid, role = %profile.rol, "User logged in");
        let uid = provider.uid.clone();
        let email = provider.email.clone();
        self.sessions.insert(UserSession {
            id: session_id,
            provider,
            profile: profile.clone(),
        });

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            uid,
            email,
            profile,
        })
    }

    pub async fn logout(&self, session_id: &str) -> DomainResult<()> {
        let Some(session) = self.sessions.remove(session_id) else {
            return Ok(());
        };
        if let Err(e) = self.identity.sign_out(&session.provider).await {
            warn!(uid = %session.provider.uid, error = %e, "Provider sign-out failed");
        }
        info!(uid = %session.provider.uid, "User logged out");
        Ok(())
    }

    /// Current account; the profile is re-read so edits made elsewhere show up
    pub async fn me(&self, session_id: &str) -> DomainResult<Account> {
        let session = self.session(session_id)?;
        let profile = match self.load_profile(&session.provider.uid).await {
            Some(profile) => {
                self.sessions.set_profile(session_id, profile.clone());
                profile
            }
            None => session.profile,
        };
        Ok(Account {
            uid: session.provider.uid,
            email: session.provider.email,
            profile,
        })
    }

    // ── Settings ────────────────────────────────────────────────

    /// Save display name and photo on `usuarios/{uid}`.
    ///
    /// A `data:` URL photo is uploaded first and replaced by its download URL.
    pub async fn update_profile(
        &self,
        session_id: &str,
        nombre: &str,
        foto: Option<String>,
    ) -> DomainResult<UserProfile> {
        let session = self.session(session_id)?;
        let uid = &session.provider.uid;

        let foto = match foto.filter(|f| !f.is_empty()) {
            Some(f) if is_data_url(&f) => Some(self.upload_profile_photo(uid, &f).await?),
            other => other,
        };

        let mut fields = Map::new();
        fields.insert("nombre".into(), json!(nombre.trim()));
        fields.insert("foto".into(), foto.clone().map_or(Value::Null, Value::String));

        self.documents
            .update_fields(Collection::Usuarios, uid, fields)
            .await
            .map_err(|e| {
                warn!(%uid, error = %e, "Profile update failed");
                DomainError::WriteFailed(messages::PROFILE_FAILED)
            })?;

        let profile = UserProfile {
            nombre: nombre.trim().to_string(),
            foto,
            ..session.profile
        };
        self.sessions.set_profile(session_id, profile.clone());
        info!(%uid, "Profile updated");
        Ok(profile)
    }

    /// Change the account password.
    ///
    /// Checks run in order: confirmation, length, then session freshness.
    pub async fn update_password(
        &self,
        session_id: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> DomainResult<()> {
        if new_password != confirm_password {
            return Err(DomainError::Validation(messages::PASSWORD_MISMATCH.into()));
        }
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(messages::PASSWORD_TOO_SHORT.into()));
        }

        let session = self.session(session_id)?;
        if Utc::now() - session.provider.signed_in_at > self.recent_login {
            return Err(DomainError::StaleSession);
        }

        match self
            .identity
            .update_password(&session.provider, new_password)
            .await
        {
            Ok(()) => {
                info!(uid = %session.provider.uid, "Password changed");
                Ok(())
            }
            Err(InfraError::RecentLoginRequired) => Err(DomainError::StaleSession),
            Err(e) => {
                warn!(uid = %session.provider.uid, error = %e, "Password change failed");
                Err(DomainError::WriteFailed(messages::SAVE_FAILED))
            }
        }
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn session(&self, session_id: &str) -> DomainResult<UserSession> {
        self.sessions
            .get(session_id)
            .ok_or_else(|| DomainError::Unauthorized(messages::SESSION_REQUIRED.into()))
    }

    async fn load_profile(&self, uid: &str) -> Option<UserProfile> {
        match self.documents.get(Collection::Usuarios, uid).await {
            Ok(Some(doc)) => match doc.decode::<UserProfile>() {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(%uid, error = %e, "Unreadable profile document");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(%uid, error = %e, "Profile lookup failed");
                None
            }
        }
    }

    async fn upload_profile_photo(&self, uid: &str, data_url: &str) -> DomainResult<String> {
        let image =
            parse_data_url(data_url).ok_or(DomainError::WriteFailed(messages::PROFILE_FAILED))?;
        let path = format!(
            "{}/{}_{}.{}",
            PROFILE_PHOTO_PREFIX,
            uid,
            Utc::now().timestamp_millis(),
            image.extension()
        );
        self.blobs
            .upload(&path, image.bytes, &image.content_type)
            .await
            .map_err(|e| {
                warn!(%uid, error = %e, "Profile photo upload failed");
                DomainError::WriteFailed(messages::PROFILE_FAILED)
            })
    }
}
