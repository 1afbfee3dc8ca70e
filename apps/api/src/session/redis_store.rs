//! Redis-backed session store for production.
//!
//! Layout:
//! - `session:{id}` → session JSON, expires after the configured TTL
//! - `chat_history` → list of history entry JSON, newest at the head (LPUSH),
//!   trimmed to `MAX_HISTORY_ENTRIES`

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client as RedisClient};
use tracing::{debug, info};
use uuid::Uuid;

use crate::session::models::{HistoryEntry, Session};
use crate::session::store::{history_entry, SessionStore, StoreError, MAX_HISTORY_ENTRIES};

const SESSION_KEY_PREFIX: &str = "session:";
const HISTORY_KEY: &str = "chat_history";

fn session_key(id: Uuid) -> String {
    format!("{SESSION_KEY_PREFIX}{id}")
}

/// Removes the session and pushes its history entry as one MULTI/EXEC,
/// trimming `chat_history` to the newest `MAX_HISTORY_ENTRIES`.
fn archive_pipeline(id: Uuid, entry_json: &str) -> redis::Pipeline {
    let keep = isize::try_from(MAX_HISTORY_ENTRIES).unwrap_or(isize::MAX);
    let mut pipe = redis::pipe();
    pipe.atomic()
        .del(session_key(id))
        .ignore()
        .lpush(HISTORY_KEY, entry_json)
        .ignore()
        .ltrim(HISTORY_KEY, 0, keep - 1)
        .ignore();
    pipe
}

#[derive(Clone)]
pub struct RedisSessionStore {
    client: RedisClient,
    session_ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(client: RedisClient, session_ttl_secs: u64) -> Self {
        Self {
            client,
            session_ttl_secs,
        }
    }

    pub fn open(redis_url: &str, session_ttl_secs: u64) -> Result<Self, StoreError> {
        let client = RedisClient::open(redis_url)?;
        info!("Redis session store configured (ttl: {session_ttl_secs}s)");
        Ok(Self::new(client, session_ttl_secs))
    }

    async fn conn(&self) -> Result<MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self) -> Result<Session, StoreError> {
        let session = Session::new();
        self.save(&session).await?;
        Ok(session)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn.get(session_key(id)).await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        let json = serde_json::to_string(session)?;
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(session_key(session.id), json, self.session_ttl_secs)
            .await?;
        debug!(session_id = %session.id, turns = session.turns.len(), "Session saved");
        Ok(())
    }

    async fn archive(&self, session: &Session, title: &str) -> Result<HistoryEntry, StoreError> {
        let entry = history_entry(session, title);
        let json = serde_json::to_string(&entry)?;

        let mut conn = self.conn().await?;
        archive_pipeline(session.id, &json)
            .query_async::<_, ()>(&mut conn)
            .await?;

        Ok(entry)
    }

    async fn discard(&self, id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(session_key(id)).await?;
        Ok(())
    }

    async fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.conn().await?;
        let stop = isize::try_from(limit).unwrap_or(isize::MAX) - 1;
        let raw: Vec<String> = conn.lrange(HISTORY_KEY, 0, stop).await?;
        raw.iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
