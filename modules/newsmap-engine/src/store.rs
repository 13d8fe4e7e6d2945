// In-memory session store with idle eviction.
//
// Per-session atomicity comes from one tokio Mutex per entry: two concurrent
// guesses for the same session serialize on it, and the loser sees the round
// already resolved. Cross-session operations need no global ordering.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::session::GameSession;

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<GameSession>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, session: GameSession) {
        let id = session.id;
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
    }

    /// Look up a session, evicting it if it has been idle past `idle_ttl`.
    /// Evicted and never-existed ids are indistinguishable to callers.
    pub async fn get(&self, id: Uuid, idle_ttl: Duration) -> Option<Arc<Mutex<GameSession>>> {
        let entry = self.sessions.read().await.get(&id).cloned()?;

        let stale = entry.lock().await.idle_for() >= idle_ttl;
        if stale {
            debug!(session_id = %id, "Evicting idle session on access");
            self.sessions.write().await.remove(&id);
            return None;
        }
        Some(entry)
    }

    /// Sweep sessions idle past `idle_ttl`. Entries currently locked by an
    /// in-flight operation are skipped; they are active by definition.
    pub async fn evict_stale(&self, idle_ttl: Duration) {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| match entry.try_lock() {
            Ok(session) => session.idle_for() < idle_ttl,
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, "Swept idle sessions");
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
