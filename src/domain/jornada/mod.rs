//! Jornada aggregate
//!
//! One worker shift with its hour breakdown and pay. Records are produced by
//! the field app; this service only reads them.

pub mod listing;
pub mod model;

pub use listing::{
    build_listing, filter_options, sort_jornadas, stats, visible_jornadas, FilterOptions,
    JornadaListing, JornadaQuery, JornadaStats,
};
pub use model::Jornada;
