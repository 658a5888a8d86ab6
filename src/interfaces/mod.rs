//! Inbound adapters: the REST API and the live-view WebSocket

pub mod http;
pub mod ws;
