//! Session store — in-memory map of session id to isolated session state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::Session;

struct Entry {
    session: Arc<Mutex<Session>>,
    last_seen: Instant,
}

/// All live sessions, keyed by the id carried in the session cookie.
///
/// Each session sits behind its own mutex; a request holds it for the whole
/// handling pass, so one session never runs two flow calls at once.
///
/// At most `max_sessions` are live; creating one past the bound evicts the
/// least recently seen.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    greeting: String,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(
        greeting: impl Into<String>,
        idle_timeout: Duration,
        max_sessions: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            greeting: greeting.into(),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        })
    }

    /// Look up a session by id, creating a fresh one if the id is unknown
    /// or absent. Returns the (possibly new) id, the session, and whether it
    /// was created.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, Arc<Mutex<Session>>, bool) {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
                return (id, Arc::clone(&entry.session), false);
            }
            debug!(session = %id, "Unknown session id, starting a new session");
        }

        // Opportunistic sweep while we hold the write lock anyway.
        let idle_timeout = self.idle_timeout;
        sessions.retain(|_, e| now.duration_since(e.last_seen) < idle_timeout);

        // Still full: drop the least recently seen sessions.
        let excess = (sessions.len() + 1).saturating_sub(self.max_sessions);
        if excess > 0 {
            let mut by_age: Vec<(Uuid, Instant)> =
                sessions.iter().map(|(id, e)| (*id, e.last_seen)).collect();
            by_age.sort_by_key(|(_, seen)| *seen);
            for (old, _) in by_age.into_iter().take(excess) {
                sessions.remove(&old);
            }
            warn!(evicted = excess, max = self.max_sessions, "Session limit reached");
        }

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::new(self.greeting.clone())));
        sessions.insert(
            id,
            Entry {
                session: Arc::clone(&session),
                last_seen: now,
            },
        );
        info!(session = %id, live = sessions.len(), "Session created");
        (id, session, true)
    }

    /// Drop sessions idle for longer than the idle timeout.
    /// Returns the number removed.
    pub async fn prune_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, e| now.duration_since(e.last_seen) < self.idle_timeout);
        let removed = before - sessions.len();
        if removed > 0 {
            info!(count = removed, "Pruned idle sessions");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Spawn a background task that periodically drops idle sessions.
pub fn spawn_prune_task(store: Arc<SessionStore>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            store.prune_idle().await;
        }
    })
}
