//! Server-side sessions.
//!
//! The JWT handed to the UI only carries a session id; the provider
//! session (and its ID token) stays here.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::domain::{ProviderSession, UserProfile};

#[derive(Debug, Clone)]
pub struct UserSession {
    pub id: String,
    pub provider: ProviderSession,
    pub profile: UserProfile,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, UserSession>,
    /// Dropped on removal, which wakes every receiver from [`SessionRegistry::watch`]
    closers: DashMap<String, watch::Sender<()>>,
}

pub type SharedSessionRegistry = Arc<SessionRegistry>;

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: UserSession) {
        self.closers
            .entry(session.id.clone())
            .or_insert_with(|| watch::channel(()).0);
        self.sessions.insert(session.id.clone(), session);
    }

    pub fn get(&self, id: &str) -> Option<UserSession> {
        self.sessions.get(id).map(|s| s.value().clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn remove(&self, id: &str) -> Option<UserSession> {
        self.closers.remove(id);
        self.sessions.remove(id).map(|(_, s)| s)
    }

    /// Receiver whose `changed()` fails once the session is removed.
    /// `None` when the session is already gone.
    pub fn watch(&self, id: &str) -> Option<watch::Receiver<()>> {
        self.closers.get(id).map(|closer| closer.subscribe())
    }

    pub fn set_profile(&self, id: &str, profile: UserProfile) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.profile = profile;
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn sessions_are_keyed_by_id() {
        let registry = SessionRegistry::new();
        registry.insert(UserSession {
            id: "s1".into(),
            provider: ProviderSession {
                uid: "u1".into(),
                email: "a@b.co".into(),
                id_token: "t".into(),
                signed_in_at: Utc::now(),
            },
            profile: UserProfile::default(),
        });

        registry.set_profile(
            "s1",
            UserProfile {
                nombre: "Ana".into(),
                ..UserProfile::default()
            },
        );
        assert_eq!(registry.get("s1").unwrap().profile.nombre, "Ana");
        assert!(registry.remove("s1").is_some());
        assert!(!registry.contains("s1"));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn watchers_wake_when_session_is_removed() {
        let registry = SessionRegistry::new();
        registry.insert(UserSession {
            id: "s1".into(),
            provider: ProviderSession {
                uid: "u1".into(),
                email: "a@b.co".into(),
                id_token: "t".into(),
                signed_in_at: Utc::now(),
            },
            profile: UserProfile::default(),
        });
        let mut ended = registry.watch("s1").unwrap();

        // re-inserting the same session keeps existing watchers alive
        let session = registry.get("s1").unwrap();
        registry.insert(session);
        assert!(!ended.has_changed().unwrap());

        registry.remove("s1");
        assert!(ended.changed().await.is_err());
        assert!(registry.watch("s1").is_none());
    }
}
