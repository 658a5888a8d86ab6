//! # AMA Workforce
//!
//! Backend for the AMA workforce management screens: attendance and payroll
//! (jornadas), personnel, PPE (dotación), client sites and their rates.
//!
//! ## Architecture
//!
//! - **domain**: screen view-state derivations and the backend ports
//! - **application**: use cases, sessions and live feeds
//! - **infrastructure**: in-memory and Firebase REST backends, JWT
//! - **interfaces**: REST API with Swagger UI and the live-view WebSocket
//! - **server**: runtime shared by both binaries

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use interfaces::http::create_api_router;
