//! AMA Workforce - CLI server
//!
//! Headless service for the workforce screens, suitable for a systemd unit
//! or a container.
//!
//! ```sh
//! # Default config (~/.config/ama-workforce/config.toml)
//! ama-service
//!
//! # Custom config, in-memory backend seeded from a file
//! ama-service --config ./config.toml --backend memory --seed ./seed.json
//!
//! # Validate config without starting
//! ama-service --check
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};

use ama_workforce::config::{default_config_path, AppConfig, BackendKind};
use ama_workforce::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Memory,
    Firebase,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Memory => BackendKind::Memory,
            BackendArg::Firebase => BackendKind::Firebase,
        }
    }
}

/// AMA Workforce - backend for the personnel, attendance and PPE screens.
#[derive(Parser, Debug)]
#[command(
    name = "ama-service",
    version,
    about = "Backend service for the AMA workforce management screens",
    long_about = "AMA Workforce - REST API and live-view WebSocket over a Firebase \
                  project or an in-memory store.\n\n\
                  Default config: ~/.config/ama-workforce/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "AMA_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the backend.
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Seed file for the in-memory backend.
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Do not install the Prometheus recorder.
    #[arg(long)]
    no_metrics: bool,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(backend) = cli.backend {
        config.backend.kind = backend.into();
    }
    if let Some(ref seed) = cli.seed {
        config.backend.memory.seed_file = Some(seed.clone());
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            warn!("Using default configuration.");
        }
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Backend     : {:?}", config.backend.kind);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        enable_metrics: !cli.no_metrics,
    })
    .await?;

    handle.install_signal_handler();
    handle.wait().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_flag_can_come_from_the_environment() {
        let command = Cli::command();
        let config = command
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .unwrap();
        assert_eq!(config.get_env(), Some(std::ffi::OsStr::new("AMA_CONFIG")));

        let cli = Cli::try_parse_from(["ama-service", "--backend", "memory", "--api-port", "0"]).unwrap();
        assert!(matches!(cli.backend, Some(BackendArg::Memory)));
        assert_eq!(cli.api_port, Some(0));
    }
}
