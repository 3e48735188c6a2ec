use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::model::Id;
use crate::store::MemStore;

/// Session token -> (user id, expires_at).
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<DashMap<String, (Id, Instant)>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn create(&self, user_id: Id) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let expires = Instant::now() + self.ttl;
        self.inner.insert(token.clone(), (user_id, expires));
        token
    }

    pub fn get(&self, token: &str) -> Option<Id> {
        let entry = self.inner.get(token)?;
        if entry.1 > Instant::now() {
            Some(entry.0)
        } else {
            drop(entry);
            self.inner.remove(token);
            None
        }
    }

    pub fn remove(&self, token: &str) {
        self.inner.remove(token);
    }

    /// Drops every expired session and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.len();
        self.inner.retain(|_, (_, expires)| *expires > now);
        before.saturating_sub(self.inner.len())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<RwLock<MemStore>>,
    pub sessions: SessionStore,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(store: MemStore, sessions: SessionStore, secure_cookies: bool) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            sessions,
            secure_cookies,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::SessionStore;

    #[test]
    fn sessions_resolve_until_removed() {
        let sessions = SessionStore::new(Duration::from_secs(60));
        let token = sessions.create(7);
        assert_eq!(sessions.get(&token), Some(7));
        sessions.remove(&token);
        assert_eq!(sessions.get(&token), None);
    }

    #[test]
    fn expired_sessions_are_purged() {
        let sessions = SessionStore::new(Duration::ZERO);
        let token = sessions.create(1);
        sessions.create(2);
        assert_eq!(sessions.get(&token), None);
        assert_eq!(sessions.purge_expired(), 1);
        assert_eq!(sessions.len(), 0);
    }
}
