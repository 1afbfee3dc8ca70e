//! Session storage: pluggable persistence for active sessions and chat history.
//!
//! `InMemorySessionStore` backs dev and tests; `RedisSessionStore` (redis_store.rs)
//! backs production. The controller holds an `Arc<dyn SessionStore>`.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use crate::session::models::{HistoryEntry, Session};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persists a fresh, empty session and returns it.
    async fn create(&self) -> Result<Session, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Session>, StoreError>;

    /// Overwrites the stored copy of `session`.
    async fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Removes the session and records `title` as a history entry for it.
    async fn archive(&self, session: &Session, title: &str) -> Result<HistoryEntry, StoreError>;

    /// Removes the session without leaving a history entry.
    async fn discard(&self, id: Uuid) -> Result<(), StoreError>;

    /// Archived sessions, newest first.
    async fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>, StoreError>;

    fn backend(&self) -> &'static str;
}

/// Archived sessions kept per store; older entries are dropped on archive.
pub const MAX_HISTORY_ENTRIES: usize = 500;

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(86_400);

pub(crate) fn history_entry(session: &Session, title: &str) -> HistoryEntry {
    HistoryEntry {
        id: session.id,
        title: title.to_string(),
        turn_count: session.turns.len(),
        created_at: session.created_at,
        archived_at: Utc::now(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// InMemorySessionStore
// ────────────────────────────────────────────────────────────────────────────

struct StoredSession {
    session: Session,
    expires_at: Instant,
}

/// Sessions expire `session_ttl` after their last save, like the Redis
/// backend's `SET EX`. Expired entries are swept on every write.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, StoredSession>>,
    session_ttl: Duration,
    /// Oldest first; reversed on read.
    history: RwLock<VecDeque<HistoryEntry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::default(),
            session_ttl: DEFAULT_SESSION_TTL,
            history: RwLock::default(),
        }
    }

    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    async fn put(&self, session: &Session) {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, stored| stored.expires_at > now);
        sessions.insert(
            session.id,
            StoredSession {
                session: session.clone(),
                expires_at: now + self.session_ttl,
            },
        );
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> Result<Session, StoreError> {
        let session = Session::new();
        self.put(&session).await;
        Ok(session)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        let now = Instant::now();
        Ok(self
            .sessions
            .read()
            .await
            .get(&id)
            .filter(|stored| stored.expires_at > now)
            .map(|stored| stored.session.clone()))
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.put(session).await;
        Ok(())
    }

    async fn archive(&self, session: &Session, title: &str) -> Result<HistoryEntry, StoreError> {
        self.sessions.write().await.remove(&session.id);
        let entry = history_entry(session, title);
        let mut history = self.history.write().await;
        history.push_back(entry.clone());
        while history.len() > MAX_HISTORY_ENTRIES {
            history.pop_front();
        }
        Ok(entry)
    }

    async fn discard(&self, id: Uuid) -> Result<(), StoreError> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }

    async fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self
            .history
            .read()
            .await
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
