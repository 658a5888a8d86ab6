//! Application services, one per screen.
//!
//! Each service loads the collections its screen reads and hands the
//! documents to the pure derivations in `domain`. The `project_*`
//! functions are shared with the live feed so REST and WebSocket views
//! stay identical.

mod dashboard;
mod dotacion;
mod inventario;
mod jornadas;
mod personal;
mod rutas;
mod sedes;

pub use dashboard::{project_dashboard, DashboardService};
pub use dotacion::{project_dotacion, DotacionScreen, DotacionService, StockView};
pub use inventario::InventarioService;
pub use jornadas::{jornadas_csv, project_jornadas, JornadasService};
pub use personal::{project_roster, PersonalService};
pub use rutas::RutasService;
pub use sedes::{project_sedes, SedesService};

use tracing::warn;

use crate::domain::ports::{Collection, Document, DocumentStore, OrderBy};

/// List a collection; a failed read is logged and yields no documents
pub(crate) async fn load(
    documents: &dyn DocumentStore,
    collection: Collection,
    order: Option<&OrderBy>,
) -> Vec<Document> {
    match documents.list(collection, order).await {
        Ok(docs) => docs,
        Err(e) => {
            warn!(%collection, error = %e, "Read failed, showing empty data");
            Vec::new()
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use async_trait::async_trait;
    use serde_json::{Map, Value};

    use crate::domain::ports::{Collection, Document, DocumentStore, Fields, OrderBy, Subscription};
    use crate::infrastructure::MemoryBackend;
    use crate::shared::errors::{InfraError, InfraResult};

    pub fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    pub fn seed(backend: &MemoryBackend, collection: Collection, docs: &[(&str, Value)]) {
        for (id, value) in docs {
            backend
                .documents
                .insert(collection, *id, fields(value.clone()));
        }
    }

    /// Store whose every call fails
    pub struct BrokenStore;

    fn down<T>() -> InfraResult<T> {
        Err(InfraError::Backend("unavailable".into()))
    }

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn get(&self, _: Collection, _: &str) -> InfraResult<Option<Document>> {
            down()
        }

        async fn list(&self, _: Collection, _: Option<&OrderBy>) -> InfraResult<Vec<Document>> {
            down()
        }

        async fn create(&self, _: Collection, _: Fields) -> InfraResult<String> {
            down()
        }

        async fn update_fields(&self, _: Collection, _: &str, _: Fields) -> InfraResult<()> {
            down()
        }

        async fn subscribe(&self, _: Collection, _: Option<OrderBy>) -> InfraResult<Subscription> {
            down()
        }
    }
}
