//! Authentication middleware for Axum
//!
//! A request is authenticated when its bearer JWT verifies and the session
//! it names is still in the registry. Module guards then apply the access
//! matrix of the signed-in role.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::common::ApiResponse;
use crate::application::SharedSessionRegistry;
use crate::domain::user::{has_access, Module, ModuleAccess};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::shared::errors::messages;

/// Authentication error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    SessionClosed,
    NoAccess,
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub sessions: SharedSessionRegistry,
}

/// Signed-in user, available to handlers as an extension
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub uid: String,
    pub email: String,
    pub role: String,
    pub modules: ModuleAccess,
    pub session_id: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            uid: claims.sub,
            email: claims.email,
            role: claims.role,
            modules: claims.modules,
            session_id: claims.sid,
        }
    }

    pub fn can_access(&self, module: Module) -> bool {
        has_access(&self.role, &self.modules, module)
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ").map(str::trim)
}

/// Verify a token and its server-side session
pub fn authenticate(token: &str, state: &AuthState) -> Result<AuthenticatedUser, AuthError> {
    let claims = verify_token(token, &state.jwt_config).map_err(|_| AuthError::InvalidToken)?;
    if !state.sessions.contains(&claims.sid) {
        return Err(AuthError::SessionClosed);
    }
    Ok(AuthenticatedUser::from_claims(claims))
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };
    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match authenticate(token, &auth_state) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error_response(e),
    }
}

/// Module guard; must run after `auth_middleware`
pub async fn require_module(
    State(module): State<Module>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(user) if user.can_access(module) => next.run(request).await,
        Some(_) => auth_error_response(AuthError::NoAccess),
        None => auth_error_response(AuthError::MissingToken),
    }
}

pub fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken | AuthError::InvalidToken | AuthError::SessionClosed => {
            (StatusCode::UNAUTHORIZED, messages::SESSION_REQUIRED)
        }
        AuthError::NoAccess => (StatusCode::FORBIDDEN, messages::NO_ACCESS),
    };
    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::application::identity::{SessionRegistry, UserSession};
    use crate::domain::{ProviderSession, UserProfile};
    use crate::infrastructure::crypto::jwt::create_token;

    fn state() -> AuthState {
        AuthState {
            jwt_config: JwtConfig::default(),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }

    fn token(state: &AuthState, sid: &str) -> String {
        let claims = TokenClaims::new(
            "u1",
            "a@b.co",
            "Auxiliar",
            ModuleAccess::default(),
            sid,
            &state.jwt_config,
        );
        create_token(&claims, &state.jwt_config).unwrap()
    }

    #[test]
    fn token_without_live_session_is_rejected() {
        let state = state();
        let token = token(&state, "gone");
        assert_eq!(authenticate(&token, &state).unwrap_err(), AuthError::SessionClosed);
        assert_eq!(authenticate("garbage", &state).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn token_with_session_authenticates() {
        let state = state();
        state.sessions.insert(UserSession {
            id: "s1".into(),
            provider: ProviderSession {
                uid: "u1".into(),
                email: "a@b.co".into(),
                id_token: "t".into(),
                signed_in_at: Utc::now(),
            },
            profile: UserProfile::default(),
        });
        let user = authenticate(&token(&state, "s1"), &state).unwrap();
        assert_eq!(user.uid, "u1");
        assert!(!user.can_access(Module::Personal));
        assert!(user.can_access(Module::Jornadas));
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("Basic abc"), None);
    }
}
