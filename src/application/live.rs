//! Live screens.
//!
//! A [`LiveFeed`] subscribes to every collection a screen reads and yields
//! the recomputed view-state each time one of them changes. The view is
//! only produced once every source has delivered its first snapshot.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::services::{
    project_dashboard, project_dotacion, project_jornadas, project_roster, project_sedes,
    DashboardService, DotacionService, JornadasService, PersonalService,
};
use crate::domain::dashboard::DashboardFilter;
use crate::domain::jornada::JornadaQuery;
use crate::domain::period;
use crate::domain::ports::{Collection, Document, DocumentStore, OrderBy};
use crate::domain::trabajador::{RosterQuery, ACTIVE_STATE};
use crate::domain::Module;
use crate::shared::errors::InfraResult;

/// Screen plus its filters
#[derive(Debug, Clone, PartialEq)]
pub enum LiveView {
    Dashboard(DashboardFilter),
    Jornadas(JornadaQuery),
    Personal(RosterQuery),
    Dotacion { search: String },
    Sedes { search: String },
}

impl LiveView {
    /// Build a view from a screen name and its query parameters
    pub fn from_params(screen: &str, params: &HashMap<String, String>) -> Option<Self> {
        let text = |key: &str| params.get(key).cloned().unwrap_or_default();
        let opt = |key: &str| params.get(key).filter(|v| !v.is_empty()).cloned();
        Some(match screen {
            "dashboard" => LiveView::Dashboard(DashboardFilter {
                month: opt("month"),
                client: opt("client"),
                cost_center: opt("cost_center"),
            }),
            "jornadas" => LiveView::Jornadas(JornadaQuery {
                search: text("search"),
                client: opt("client"),
                cost_center: opt("cost_center"),
                from: opt("from"),
                to: opt("to"),
            }),
            "personal" => LiveView::Personal(RosterQuery {
                search: text("search"),
                estado: opt("estado").unwrap_or_else(|| ACTIVE_STATE.to_string()),
            }),
            "dotacion" => LiveView::Dotacion {
                search: text("search"),
            },
            "sedes" => LiveView::Sedes {
                search: text("search"),
            },
            _ => return None,
        })
    }

    pub fn module(&self) -> Module {
        match self {
            LiveView::Dashboard(_) => Module::Dashboard,
            LiveView::Jornadas(_) => Module::Jornadas,
            LiveView::Personal(_) => Module::Personal,
            LiveView::Dotacion { .. } => Module::Dotacion,
            LiveView::Sedes { .. } => Module::Sedes,
        }
    }

    pub fn sources(&self) -> Vec<(Collection, Option<OrderBy>)> {
        match self {
            LiveView::Dashboard(_) => DashboardService::sources(),
            LiveView::Jornadas(_) => vec![JornadasService::source()],
            LiveView::Personal(_) => vec![PersonalService::source()],
            LiveView::Dotacion { .. } => DotacionService::sources(),
            LiveView::Sedes { .. } => vec![(Collection::Sedes, None)],
        }
    }

    /// View-state from one snapshot per source, in `sources()` order
    pub fn render(&self, snapshots: &[Vec<Document>], today: NaiveDate) -> Value {
        let source = |i: usize| snapshots.get(i).map(Vec::as_slice).unwrap_or(&[]);
        match self {
            LiveView::Dashboard(filter) => to_json(&project_dashboard(
                source(0),
                source(1),
                source(2),
                filter.clone(),
                today,
            )),
            LiveView::Jornadas(query) => to_json(&project_jornadas(source(0), query.clone(), today)),
            LiveView::Personal(query) => to_json(&project_roster(source(0), query)),
            LiveView::Dotacion { search } => to_json(&project_dotacion(source(0), source(1), search)),
            LiveView::Sedes { search } => to_json(&project_sedes(source(0), search)),
        }
    }
}

fn to_json<T: Serialize>(view: &T) -> Value {
    serde_json::to_value(view).unwrap_or_else(|e| {
        warn!(error = %e, "Cannot serialize live view");
        Value::Null
    })
}

/// Running live view; dropping it releases every subscription
pub struct LiveFeed {
    view: LiveView,
    updates: mpsc::Receiver<(usize, Vec<Document>)>,
    latest: Vec<Option<Vec<Document>>>,
    forwarders: Vec<JoinHandle<()>>,
}

impl LiveFeed {
    pub async fn open(documents: &dyn DocumentStore, view: LiveView) -> InfraResult<Self> {
        let sources = view.sources();
        let (tx, updates) = mpsc::channel(16);
        let mut feed = Self {
            latest: vec![None; sources.len()],
            view,
            updates,
            forwarders: Vec::with_capacity(sources.len()),
        };

        for (index, (collection, order)) in sources.into_iter().enumerate() {
            let mut subscription = documents.subscribe(collection, order).await?;
            let tx = tx.clone();
            feed.forwarders.push(tokio::spawn(async move {
                while let Some(snapshot) = subscription.next().await {
                    if tx.send((index, snapshot)).await.is_err() {
                        break;
                    }
                }
                debug!(%collection, "Live source closed");
            }));
        }
        Ok(feed)
    }

    pub fn view(&self) -> &LiveView {
        &self.view
    }

    /// Next view-state, `None` once every source is gone
    pub async fn next(&mut self) -> Option<Value> {
        loop {
            let (index, snapshot) = self.updates.recv().await?;
            if let Some(slot) = self.latest.get_mut(index) {
                *slot = Some(snapshot);
            }
            if self.latest.iter().all(Option::is_some) {
                let snapshots: Vec<Vec<Document>> =
                    self.latest.iter().map(|s| s.clone().unwrap_or_default()).collect();
                return Some(self.view.render(&snapshots, period::today()));
            }
        }
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        for task in &self.forwarders {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::application::services::fixtures::fields;
    use crate::infrastructure::MemoryBackend;
    use serde_json::json;

    #[test]
    fn unknown_screen_is_rejected() {
        assert!(LiveView::from_params("nomina", &HashMap::new()).is_none());
        let view = LiveView::from_params("personal", &HashMap::new()).unwrap();
        assert_eq!(view, LiveView::Personal(RosterQuery::default()));
        assert_eq!(view.module(), Module::Personal);
    }

    #[tokio::test]
    async fn feed_pushes_recomputed_view_on_change() {
        let backend = MemoryBackend::new("test");
        backend.documents.insert(
            Collection::Sedes,
            "s1",
            fields(json!({"Cliente": "Norte", "NIT": "1"})),
        );

        let view = LiveView::Sedes {
            search: String::new(),
        };
        let mut feed = LiveFeed::open(backend.documents.as_ref(), view).await.unwrap();

        let first = feed.next().await.unwrap();
        assert_eq!(first.as_array().map(Vec::len), Some(1));

        backend.documents.insert(
            Collection::Sedes,
            "s2",
            fields(json!({"Cliente": "Sur", "NIT": "2"})),
        );
        let second = feed.next().await.unwrap();
        assert_eq!(second.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn dashboard_waits_for_every_source() {
        let backend = MemoryBackend::new("test");
        let view = LiveView::from_params("dashboard", &HashMap::new()).unwrap();
        let mut feed = LiveFeed::open(backend.documents.as_ref(), view).await.unwrap();

        let state = feed.next().await.unwrap();
        assert_eq!(state["filtered_count"], 0);
        assert_eq!(state["dotacion"]["total"], 0);
    }

    #[tokio::test]
    async fn dropping_feed_releases_subscriptions() {
        let backend = MemoryBackend::new("test");
        let view = LiveView::Dotacion {
            search: String::new(),
        };
        let feed = LiveFeed::open(backend.documents.as_ref(), view).await.unwrap();
        assert_eq!(backend.documents.subscriber_count(Collection::EntregasEpp), 1);

        drop(feed);
        for _ in 0..100 {
            if backend.documents.subscriber_count(Collection::Dotacion) == 0
                && backend.documents.subscriber_count(Collection::EntregasEpp) == 0
            {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("subscriptions still held after drop");
    }
}
