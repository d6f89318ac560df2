//! Domain entities for the Conversations domain
//!
//! Sessions and messages as persisted, plus the read models the
//! conversation flow needs (session summaries and the profile subset used
//! for personalization).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pha_common::{Error, Result};

/// Maximum characters kept in a session preview before the ellipsis
pub const PREVIEW_MAX_CHARS: usize = 80;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_sender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Ai,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Ai => write!(f, "ai"),
        }
    }
}

/// A conversation thread owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            started_at: Utc::now(),
        }
    }
}

/// One turn of a session. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    /// 1-based, strictly increasing within a session
    pub sequence: i32,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(session_id: Uuid, role: MessageRole, content: String, sequence: i32) -> Result<Self> {
        Self::validate_content(&content)?;
        Self::validate_sequence(sequence)?;

        Ok(ChatMessage {
            id: Uuid::new_v4(),
            session_id,
            role,
            content,
            sequence,
            created_at: Utc::now(),
        })
    }

    /// Validate message content (CHECK (length(trim(content)) > 0))
    fn validate_content(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(Error::Validation(
                "Message content cannot be empty or whitespace-only".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate sequence (CHECK (sequence >= 1))
    fn validate_sequence(sequence: i32) -> Result<()> {
        if sequence < 1 {
            return Err(Error::Validation(
                "Message sequence must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A session as shown in the session list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub preview: Option<String>,
    pub message_count: i64,
}

impl SessionSummary {
    /// Build a summary from the session's most recent message text
    pub fn new(
        id: Uuid,
        started_at: DateTime<Utc>,
        last_message: Option<&str>,
        message_count: i64,
    ) -> Self {
        Self {
            id,
            started_at,
            preview: last_message.map(preview_of),
            message_count,
        }
    }
}

/// Truncate to `PREVIEW_MAX_CHARS` characters, marking the cut with `…`
pub fn preview_of(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_MAX_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// Profile attributes used to personalize the model context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatProfile {
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub language: String,
}
