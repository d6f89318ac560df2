//! Chat message repository

use pha_common::{is_unique_violation, Error, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{ChatMessage, MessageRole};

/// Attempts before a sequence collision is reported as an error
const MAX_APPEND_ATTEMPTS: usize = 3;

const SEQUENCE_CONSTRAINT: &str = "chat_messages_session_id_sequence_key";

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List messages for a session, ordered by sequence ASC
    pub async fn list_by_session(&self, session_id: Uuid) -> Result<Vec<ChatMessage>> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, session_id, role, content, sequence, created_at
            FROM chat_messages
            WHERE session_id = $1
            ORDER BY sequence ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// The last `limit` messages of a session, ordered by sequence ASC
    pub async fn list_recent(&self, session_id: Uuid, limit: usize) -> Result<Vec<ChatMessage>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, session_id, role, content, sequence, created_at
            FROM (
                SELECT id, session_id, role, content, sequence, created_at
                FROM chat_messages
                WHERE session_id = $1
                ORDER BY sequence DESC
                LIMIT $2
            ) recent
            ORDER BY sequence ASC
            "#,
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Append a message with the next sequence number.
    ///
    /// The sequence is computed inside the INSERT; a concurrent writer that
    /// took the same number trips the unique constraint and we try again.
    pub async fn append(
        &self,
        session_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage> {
        for attempt in 1..=MAX_APPEND_ATTEMPTS {
            let result = sqlx::query_as::<_, ChatMessage>(
                r#"
                INSERT INTO chat_messages (id, session_id, role, content, sequence, created_at)
                SELECT $1, $2, $3, $4, COALESCE(MAX(sequence), 0) + 1, NOW()
                FROM chat_messages
                WHERE session_id = $2
                RETURNING id, session_id, role, content, sequence, created_at
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(session_id)
            .bind(role)
            .bind(content)
            .fetch_one(&self.pool)
            .await;

            match result {
                Ok(message) => return Ok(message),
                Err(e) if is_unique_violation(&e, Some(SEQUENCE_CONSTRAINT)) => {
                    tracing::debug!(
                        session_id = %session_id,
                        attempt,
                        "Message sequence collision, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::error!(session_id = %session_id, "Exhausted retries allocating message sequence");
        Err(Error::Conflict(
            "Could not allocate message sequence".to_string(),
        ))
    }
}
