//! Seed file for the in-memory backend.
//!
//! ```json
//! {
//!   "accounts": [{"email": "admin@ama.co", "password": "secreto", "uid": "u1"}],
//!   "collections": {"usuarios": {"u1": {"nombre": "Admin", "rol": "Administrador"}}}
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::{InMemoryDocumentStore, InMemoryIdentityProvider};
use crate::domain::ports::{Collection, Fields};
use crate::shared::errors::{InfraError, InfraResult};

#[derive(Debug, Clone, Deserialize)]
pub struct SeedAccount {
    pub email: String,
    pub password: String,
    pub uid: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedFile {
    pub accounts: Vec<SeedAccount>,
    /// collection name -> document id -> fields
    pub collections: HashMap<String, HashMap<String, Fields>>,
}

impl SeedFile {
    pub fn load(path: &Path) -> InfraResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| InfraError::Backend(format!("Cannot read seed {}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn apply(self, identity: &InMemoryIdentityProvider, documents: &InMemoryDocumentStore) {
        for account in &self.accounts {
            identity.add_account(&account.email, &account.password, &account.uid);
        }

        let mut loaded = 0usize;
        for (name, docs) in self.collections {
            let Some(collection) = Collection::from_name(&name) else {
                warn!("Seed collection '{}' is unknown, skipping", name);
                continue;
            };
            for (id, fields) in docs {
                documents.insert(collection, id, fields);
                loaded += 1;
            }
        }
        info!(
            accounts = self.accounts.len(),
            documents = loaded,
            "In-memory backend seeded"
        );
    }
}
