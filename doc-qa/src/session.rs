//! Per-user search sessions and their lifecycle.
//!
//! A [`SearchSession`] holds the selected repository and the history list.
//! [`SessionStore`] owns all live sessions: it creates them on first use of an
//! id, ends them on request and drops those idle longer than the configured
//! TTL whenever it is accessed.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    history::{SearchHistory, SearchRecord},
    repository::RepositoryChoice,
};

/// Session state shared by reference with the search pipeline.
#[derive(Debug)]
pub struct SearchSession {
    id: Uuid,
    repository: RepositoryChoice,
    history: SearchHistory,
    created_at: DateTime<Utc>,
}

impl SearchSession {
    pub fn new(id: Uuid, repository: RepositoryChoice) -> Self {
        Self {
            id,
            repository,
            history: SearchHistory::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn repository(&self) -> RepositoryChoice {
        self.repository
    }

    pub fn select_repository(&mut self, repository: RepositoryChoice) {
        if self.repository != repository {
            debug!(session_id = %self.id, from = %self.repository, to = %repository, "repository switched");
        }
        self.repository = repository;
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn record(&mut self, record: SearchRecord) {
        self.history.push(record);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// Handle to one live session. Holding the lock serializes actions on it.
pub type SessionHandle = Arc<Mutex<SearchSession>>;

struct Entry {
    session: SessionHandle,
    last_seen: Instant,
}

/// All live sessions, keyed by id.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    default_repository: RepositoryChoice,
    idle_ttl: Option<Duration>,
}

impl SessionStore {
    /// `idle_ttl = None` keeps sessions until they are ended explicitly.
    pub fn new(default_repository: RepositoryChoice, idle_ttl: Option<Duration>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            default_repository,
            idle_ttl,
        }
    }

    pub fn default_repository(&self) -> RepositoryChoice {
        self.default_repository
    }

    /// Starts a session under a fresh id.
    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle = self.get_or_create(id).await;
        (id, handle)
    }

    /// Returns the session for `id`, creating it on first use.
    pub async fn get_or_create(&self, id: Uuid) -> SessionHandle {
        self.prune_idle().await;

        let mut map = self.sessions.write().await;
        let entry = map.entry(id).or_insert_with(|| {
            info!(session_id = %id, repository = %self.default_repository, "session started");
            Entry {
                session: Arc::new(Mutex::new(SearchSession::new(
                    id,
                    self.default_repository,
                ))),
                last_seen: Instant::now(),
            }
        });
        entry.last_seen = Instant::now();
        entry.session.clone()
    }

    /// Marks `id` as active now. Call when a long action on the session ends.
    pub async fn touch(&self, id: Uuid) {
        if let Some(entry) = self.sessions.write().await.get_mut(&id) {
            entry.last_seen = Instant::now();
        }
    }

    /// Tears the session down. Returns whether it existed.
    pub async fn end(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "session ended");
        }
        removed
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops sessions not seen for longer than the idle TTL.
    /// Sessions whose handle is still held by a caller are kept.
    /// Returns how many were dropped.
    pub async fn prune_idle(&self) -> usize {
        let Some(ttl) = self.idle_ttl else {
            return 0;
        };

        let mut map = self.sessions.write().await;
        let before = map.len();
        map.retain(|_, e| e.last_seen.elapsed() <= ttl || Arc::strong_count(&e.session) > 1);
        let dropped = before - map.len();
        if dropped > 0 {
            info!(dropped, remaining = map.len(), "idle sessions expired");
        }
        dropped
    }
}
