//! Identity module: login, sessions and account settings

pub mod service;
pub mod session;

pub use service::{Account, AuthResult, AuthService, MIN_PASSWORD_LEN, PROFILE_PHOTO_PREFIX};
pub use session::{SessionRegistry, SharedSessionRegistry, UserSession};
