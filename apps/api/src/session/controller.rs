//! Chat controller: the single owner of session mutation.
//!
//! Handlers never touch the store directly for writes: every user submission
//! and reset goes through `ChatController`, which enforces one outstanding
//! submission per session.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

use crate::assistant::classifier::IntentClassifier;
use crate::errors::AppError;
use crate::session::models::{Exchange, HistoryEntry, ResetOutcome, Session, Turn};
use crate::session::store::SessionStore;

const MAX_TITLE_CHARS: usize = 40;
const UNTITLED: &str = "New chat";

/// Summarises a session into a history title: its first user message,
/// clipped to `MAX_TITLE_CHARS` characters including the trailing ellipsis.
pub fn summarize_title(session: &Session) -> String {
    let Some(first) = session.first_user_turn() else {
        return UNTITLED.to_string();
    };
    let text = first.text.trim();
    if text.chars().count() <= MAX_TITLE_CHARS {
        return text.to_string();
    }
    let clipped: String = text.chars().take(MAX_TITLE_CHARS - 1).collect();
    format!("{}…", clipped.trim_end())
}

type PendingSet = Arc<Mutex<HashSet<Uuid>>>;

/// Marks a session busy for as long as it is alive.
struct PendingGuard {
    pending: PendingSet,
    id: Uuid,
}

impl PendingGuard {
    fn acquire(pending: &PendingSet, id: Uuid) -> Result<Self, AppError> {
        let mut set = pending.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(id) {
            return Err(AppError::Conflict(format!(
                "A reply is still pending for session {id}"
            )));
        }
        Ok(Self {
            pending: Arc::clone(pending),
            id,
        })
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.id);
    }
}

#[derive(Clone)]
pub struct ChatController {
    store: Arc<dyn SessionStore>,
    classifier: Arc<IntentClassifier>,
    /// Cosmetic "thinking" pause before each reply.
    reply_delay: Duration,
    pending: PendingSet,
}

impl ChatController {
    pub fn new(
        store: Arc<dyn SessionStore>,
        classifier: Arc<IntentClassifier>,
        reply_delay: Duration,
    ) -> Self {
        Self {
            store,
            classifier,
            reply_delay,
            pending: Arc::default(),
        }
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn start_session(&self) -> Result<Session, AppError> {
        let session = self.store.create().await?;
        info!(session_id = %session.id, "Session started");
        Ok(session)
    }

    pub async fn session(&self, id: Uuid) -> Result<Session, AppError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Records the user's message, produces the assistant reply, and persists both.
    pub async fn submit(&self, id: Uuid, text: &str) -> Result<Exchange, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("text cannot be empty".to_string()));
        }

        let _guard = PendingGuard::acquire(&self.pending, id)?;
        let mut session = self.session(id).await?;

        let user = Turn::user(text);
        session.turns.push(user.clone());
        self.store.save(&session).await?;

        if !self.reply_delay.is_zero() {
            tokio::time::sleep(self.reply_delay).await;
        }

        let reply = self.classifier.classify(text);
        debug!(
            session_id = %id,
            intent = ?reply.intent,
            suggestions = reply.suggestions.as_ref().map_or(0, Vec::len),
            "Reply generated"
        );

        let assistant = Turn::assistant(reply.content, reply.intent, reply.suggestions);
        session.turns.push(assistant.clone());
        self.store.save(&session).await?;

        Ok(Exchange { user, assistant })
    }

    /// Archives the session into chat history (empty sessions are dropped)
    /// and starts a fresh one.
    pub async fn reset(&self, id: Uuid) -> Result<ResetOutcome, AppError> {
        let _guard = PendingGuard::acquire(&self.pending, id)?;
        let session = self.session(id).await?;

        let archived = if session.turns.is_empty() {
            self.store.discard(id).await?;
            None
        } else {
            let title = summarize_title(&session);
            let entry = self.store.archive(&session, &title).await?;
            info!(session_id = %id, title = %entry.title, "Session archived");
            Some(entry)
        };

        let session = self.start_session().await?;
        Ok(ResetOutcome { archived, session })
    }

    pub async fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>, AppError> {
        Ok(self.store.history(limit).await?)
    }
}
