//! Server runtime.
//!
//! [`ServerHandle`] owns the whole lifecycle: backend selection, metrics
//! recorder, REST API with the live-view WebSocket, and graceful shutdown.
//! The binaries only load configuration and call into it.

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info, warn};

use crate::config::{AppConfig, LogFormat};
use crate::infrastructure::Backend;
use crate::interfaces::http::modules::metrics::describe_metrics;
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Install the Prometheus recorder and mount `/metrics`
    pub enable_metrics: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            enable_metrics: true,
        }
    }
}

/// The global recorder can only be installed once per process, so a
/// restarted server reuses it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                describe_metrics();
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Cannot install Prometheus recorder: {}", e);
                None
            }
        })
        .clone()
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running service.
///
/// ```rust,no_run
/// use ama_workforce::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Services shared by the handlers
    pub state: AppState,
    /// The configuration the server was started with
    pub config: AppConfig,
    /// Address the API is bound to; differs from the config when port 0 was asked for
    pub local_addr: SocketAddr,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let config = opts.config;
        info!("Starting AMA Workforce service...");

        let metrics = if opts.enable_metrics {
            prometheus_handle()
        } else {
            None
        };

        let backend = Backend::from_config(&config)?;
        info!(backend = ?config.backend.kind, "Backend ready");

        let state = AppState::new(backend, &config);
        info!(
            "JWT configured with {}h token expiration",
            config.security.jwt_expiration_hours
        );

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let api_router = create_api_router(state.clone(), metrics);

        let api_addr = config.server.address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(
            listener,
            api_router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Server started");
        Ok(Self {
            state,
            config,
            local_addr,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM or SIGINT
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown without waiting for it
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait until shutdown was triggered and the API has stopped.
    ///
    /// Open live sockets are given `server.shutdown_timeout` seconds before
    /// the server task is abandoned.
    pub async fn wait(self) {
        let signal = self.shutdown.signal();
        let grace = Duration::from_secs(self.shutdown.timeout_secs());
        let mut api_task = self.api_task;

        tokio::select! {
            result = &mut api_task => {
                log_api_exit(result);
                return;
            }
            _ = signal.wait() => {}
        }

        info!("⏳ Waiting for in-flight requests...");
        match tokio::time::timeout(grace, &mut api_task).await {
            Ok(result) => log_api_exit(result),
            Err(_) => {
                warn!("Shutdown timed out after {}s, closing remaining connections", grace.as_secs());
                api_task.abort();
            }
        }
        info!(
            sessions = self.state.auth.sessions().len(),
            "👋 AMA Workforce shutdown complete"
        );
    }

    /// Trigger shutdown and wait for completion
    pub async fn shutdown(self) {
        info!("🛑 Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

fn log_api_exit(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => info!("REST API server stopped"),
        Err(e) => error!("REST API server task panicked: {}", e),
    }
}

/// Initialize tracing from the application config.
///
/// `RUST_LOG` wins over `logging.level` when set. Call once at startup.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.api_host = "127.0.0.1".to_string();
        config.server.api_port = 0;
        config.server.shutdown_timeout = 1;
        config
    }

    #[tokio::test]
    async fn serves_health_and_shuts_down() {
        let handle = ServerHandle::start(ServerOptions {
            config: local_config(),
            enable_metrics: false,
        })
        .await
        .unwrap();
        assert!(handle.is_running());

        let url = format!("http://{}/health", handle.local_addr);
        let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body["status"], "ok");

        tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
            .await
            .expect("shutdown should complete");
    }

    #[tokio::test]
    async fn incomplete_firebase_config_fails_to_start() {
        let mut config = local_config();
        config.backend.kind = crate::config::BackendKind::Firebase;
        let result = ServerHandle::start(ServerOptions {
            config,
            enable_metrics: false,
        })
        .await;
        assert!(result.is_err());
    }
}
