//! WebSocket interfaces
//!
//! - `live`: screen view-state pushed on every backend change

pub mod live;

pub use live::ws_live_handler;
