//! JWT Token handling
//!
//! Tokens identify a server-side session; the provider credentials stay in
//! the session registry and never reach the client.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::domain::user::{has_access, Module, ModuleAccess};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl JwtConfig {
    pub fn from_security(security: &SecurityConfig) -> Self {
        Self {
            secret: security.jwt_secret.clone(),
            expiration_hours: security.jwt_expiration_hours,
            issuer: "ama-workforce".to_string(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from_security(&SecurityConfig::default())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenClaims {
    /// Subject (provider uid)
    pub sub: String,
    pub email: String,
    pub role: String,
    pub modules: ModuleAccess,
    /// Session id in the registry
    pub sid: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl TokenClaims {
    pub fn new(
        uid: &str,
        email: &str,
        role: &str,
        modules: ModuleAccess,
        session_id: &str,
        config: &JwtConfig,
    ) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: uid.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            modules,
            sid: session_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn can_access(&self, module: Module) -> bool {
        has_access(&self.role, &self.modules, module)
    }
}

pub fn create_token(
    claims: &TokenClaims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a JWT token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "ama-workforce".into(),
        }
    }

    #[test]
    fn token_round_trip_keeps_claims() {
        let modules = ModuleAccess {
            personal: true,
            ..Default::default()
        };
        let claims = TokenClaims::new("uid-1", "ana@ama.co", "Auxiliar", modules, "sid-1", &config());
        let token = create_token(&claims, &config()).unwrap();
        let decoded = verify_token(&token, &config()).unwrap();

        assert_eq!(decoded, claims);
        assert!(decoded.can_access(Module::Personal));
        assert!(!decoded.can_access(Module::Sedes));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = TokenClaims::new("u", "e", "Admin", ModuleAccess::default(), "s", &config());
        let token = create_token(&claims, &config()).unwrap();
        let other = JwtConfig {
            secret: "other".into(),
            ..config()
        };
        assert!(verify_token(&token, &other).is_err());
    }
}
