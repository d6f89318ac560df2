//! Chat session repository

use chrono::{DateTime, Utc};
use pha_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{ChatSession, SessionSummary};

/// Row for the session list query
#[derive(sqlx::FromRow)]
struct SessionSummaryRow {
    id: Uuid,
    started_at: DateTime<Utc>,
    last_message: Option<String>,
    message_count: i64,
}

#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find session by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<ChatSession>> {
        let session = sqlx::query_as::<_, ChatSession>(
            r#"
            SELECT id, user_id, started_at
            FROM chat_sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Most recently started session for a user
    pub async fn find_latest(&self, user_id: Uuid) -> Result<Option<ChatSession>> {
        let session = sqlx::query_as::<_, ChatSession>(
            r#"
            SELECT id, user_id, started_at
            FROM chat_sessions
            WHERE user_id = $1
            ORDER BY started_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Start a new session for a user; the database stamps `started_at`
    pub async fn create(&self, user_id: Uuid) -> Result<ChatSession> {
        let session = ChatSession::new(user_id);

        let created = sqlx::query_as::<_, ChatSession>(
            r#"
            INSERT INTO chat_sessions (id, user_id)
            VALUES ($1, $2)
            RETURNING id, user_id, started_at
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Sessions newest-first with their latest message and count
    pub async fn list_summaries(&self, user_id: Uuid) -> Result<Vec<SessionSummary>> {
        let rows = sqlx::query_as::<_, SessionSummaryRow>(
            r#"
            SELECT s.id, s.started_at,
                   (SELECT m.content FROM chat_messages m
                    WHERE m.session_id = s.id
                    ORDER BY m.sequence DESC
                    LIMIT 1) AS last_message,
                   (SELECT COUNT(*) FROM chat_messages m
                    WHERE m.session_id = s.id) AS message_count
            FROM chat_sessions s
            WHERE s.user_id = $1
            ORDER BY s.started_at DESC, s.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                SessionSummary::new(r.id, r.started_at, r.last_message.as_deref(), r.message_count)
            })
            .collect())
    }
}
