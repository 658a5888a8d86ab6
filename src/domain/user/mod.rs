//! User aggregate
//!
//! Profiles live in `usuarios/{uid}`; the identity provider owns credentials.

pub mod access;
pub mod model;

pub use access::{has_access, Module};
pub use model::{ModuleAccess, UserProfile, DEFAULT_DISPLAY_NAME, RESTRICTED_ROLE};
