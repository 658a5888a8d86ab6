//! In-memory backend for development and tests

pub mod blobs;
pub mod documents;
pub mod identity;
pub mod seed;

pub use blobs::InMemoryBlobStore;
pub use documents::InMemoryDocumentStore;
pub use identity::InMemoryIdentityProvider;
pub use seed::{SeedAccount, SeedFile};
