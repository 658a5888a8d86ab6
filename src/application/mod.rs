//! Application layer: use cases over the backend ports

pub mod identity;
pub mod live;
pub mod media;
pub mod services;

pub use identity::{AuthService, SessionRegistry, SharedSessionRegistry};
pub use live::{LiveFeed, LiveView};
pub use services::{
    DashboardService, DotacionService, InventarioService, JornadasService, PersonalService,
    RutasService, SedesService,
};
