//! Trabajador aggregate
//!
//! Personnel records. They are created from the onboarding form and never
//! edited or deleted from this service.

pub mod form;
pub mod model;
pub mod roster;

pub use form::{photo_path, NewTrabajador, DATE_FIELDS, PHOTO_PREFIX, UPPERCASE_FIELDS};
pub use model::Trabajador;
pub use roster::{filter_roster, RosterQuery, ACTIVE_STATE, ANY_STATE};
