//! Domain layer: screen view-state derivations and the backend ports.
//!
//! Everything here is synchronous and side-effect free except the port
//! traits, which `infrastructure` implements.

pub mod dashboard;
pub mod dotacion;
pub mod inventario;
pub mod jornada;
pub mod period;
pub mod ports;
pub mod ruta;
pub mod sede;
pub mod trabajador;
pub mod user;

pub use ports::{
    BlobStore, Collection, Document, DocumentStore, Fields, IdentityProvider, OrderBy,
    ProviderSession, Subscription,
};
pub use user::{Module, UserProfile};
