//! Router state

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;

use super::middleware::AuthState;
use crate::application::{
    AuthService, DashboardService, DotacionService, InventarioService, JornadasService,
    PersonalService, RutasService, SedesService, SessionRegistry,
};
use crate::config::{AppConfig, BackendKind};
use crate::domain::ports::DocumentStore;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::Backend;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub dashboard: Arc<DashboardService>,
    pub jornadas: Arc<JornadasService>,
    pub personal: Arc<PersonalService>,
    pub dotacion: Arc<DotacionService>,
    pub sedes: Arc<SedesService>,
    pub inventario: Arc<InventarioService>,
    pub rutas: Arc<RutasService>,
    /// Used by the live WebSocket to open subscriptions
    pub documents: Arc<dyn DocumentStore>,
    pub backend_kind: BackendKind,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(backend: Backend, config: &AppConfig) -> Self {
        let Backend {
            identity,
            documents,
            blobs,
        } = backend;
        let auth = AuthService::new(
            identity,
            documents.clone(),
            blobs.clone(),
            Arc::new(SessionRegistry::new()),
            JwtConfig::from_security(&config.security),
            config.security.recent_login_minutes,
        );

        Self {
            auth: Arc::new(auth),
            dashboard: Arc::new(DashboardService::new(documents.clone())),
            jornadas: Arc::new(JornadasService::new(documents.clone())),
            personal: Arc::new(PersonalService::new(documents.clone(), blobs)),
            dotacion: Arc::new(DotacionService::new(documents.clone())),
            sedes: Arc::new(SedesService::new(documents.clone())),
            inventario: Arc::new(InventarioService::new(documents.clone())),
            rutas: Arc::new(RutasService::new(documents.clone())),
            documents,
            backend_kind: config.backend.kind,
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        AuthState {
            jwt_config: state.auth.jwt_config().clone(),
            sessions: state.auth.sessions().clone(),
        }
    }
}
