//! AMA Workforce service
//!
//! Reads `AMA_CONFIG` or `~/.config/ama-workforce/config.toml` and runs until
//! SIGTERM or Ctrl+C. The `ama-service` binary in `cli/` adds flags.

use std::path::PathBuf;

use tracing::{error, info};

use ama_workforce::config::{default_config_path, AppConfig};
use ama_workforce::server::{init_tracing, ServerHandle, ServerOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("AMA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path());

    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    let handle = ServerHandle::start(ServerOptions {
        config,
        ..ServerOptions::default()
    })
    .await?;
    handle.install_signal_handler();
    handle.wait().await;
    Ok(())
}
