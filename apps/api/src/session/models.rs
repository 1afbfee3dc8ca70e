use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assistant::classifier::Intent;
use crate::catalog::Suggestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Set on assistant turns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
            intent: None,
            suggestions: None,
        }
    }

    pub fn assistant(
        text: impl Into<String>,
        intent: Intent,
        suggestions: Option<Vec<Suggestion>>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
            intent: Some(intent),
            suggestions,
        }
    }
}

/// An active conversation. Mutated only through `ChatController`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            turns: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn first_user_turn(&self) -> Option<&Turn> {
        self.turns.iter().find(|t| t.role == Role::User)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of a session that was reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub title: String,
    pub turn_count: usize,
    pub created_at: DateTime<Utc>,
    pub archived_at: DateTime<Utc>,
}

/// One user submission and the reply it produced.
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub user: Turn,
    pub assistant: Turn,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetOutcome {
    pub archived: Option<HistoryEntry>,
    pub session: Session,
}
