use std::sync::Arc;

use super::load;
use crate::domain::ports::{decode_all, Collection, DocumentStore, OrderBy};
use crate::domain::ruta::{ruta_view, Ruta, RutaQuery, RutaView};

pub struct RutasService {
    documents: Arc<dyn DocumentStore>,
}

impl RutasService {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    pub async fn view(&self, query: &RutaQuery) -> RutaView {
        let order = OrderBy::asc("name");
        let docs = load(self.documents.as_ref(), Collection::Rutas, Some(&order)).await;
        let routes: Vec<Ruta> = decode_all(Collection::Rutas, &docs);
        ruta_view(routes, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fixtures::seed;
    use crate::infrastructure::MemoryBackend;
    use serde_json::json;

    #[tokio::test]
    async fn filters_by_status_and_summarizes() {
        let backend = MemoryBackend::new("test");
        seed(
            &backend,
            Collection::Rutas,
            &[
                ("r1", json!({"name": "Norte", "driverName": "Luis", "vehicleId": "ABC123", "progress": 140, "status": "en_progreso"})),
                ("r2", json!({"name": "Sur", "driverName": "Ana", "vehicleId": "XYZ987", "progress": 0, "status": "pendiente"})),
            ],
        );
        let service = RutasService::new(backend.backend().documents);

        let view = service
            .view(&RutaQuery {
                search: String::new(),
                status: Some("en_progreso".into()),
            })
            .await;
        assert_eq!(view.routes.len(), 1);
        assert_eq!(view.routes[0].progress, 100);
        assert_eq!(view.summary.en_progreso, 1);
        assert_eq!(view.summary.pendiente, 0);

        let by_vehicle = service.view(&RutaQuery { search: "xyz".into(), status: None }).await;
        assert_eq!(by_vehicle.routes[0].id, "r2");
    }
}
