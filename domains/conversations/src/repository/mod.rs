//! Repository implementations for Conversations domain

pub mod messages;
pub mod profiles;
pub mod sessions;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

use async_trait::async_trait;
use pha_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{ChatMessage, ChatProfile, ChatSession, MessageRole, SessionSummary};

pub use messages::MessageRepository;
pub use profiles::ProfileReadRepository;
pub use sessions::SessionRepository;

/// Durable storage for chat sessions and messages.
///
/// Messages are always returned oldest-to-newest (by `sequence`).
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Most recently started session, ties broken by id
    async fn find_latest_session(&self, user_id: Uuid) -> Result<Option<ChatSession>>;

    async fn create_session(&self, user_id: Uuid) -> Result<ChatSession>;

    async fn find_session(&self, session_id: Uuid) -> Result<Option<ChatSession>>;

    /// Append a message, allocating the next sequence number in the session
    async fn append_message(
        &self,
        session_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage>;

    /// All messages, or only the last `limit` when given
    async fn list_messages(&self, session_id: Uuid, limit: Option<usize>)
        -> Result<Vec<ChatMessage>>;

    /// Sessions newest-first with preview and message count
    async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<SessionSummary>>;

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<ChatProfile>>;
}

/// Combined repository access for the Conversations domain
#[derive(Clone)]
pub struct ConversationsRepositories {
    pool: PgPool,
    pub sessions: SessionRepository,
    pub messages: MessageRepository,
    pub profiles: ProfileReadRepository,
}

impl ConversationsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            sessions: SessionRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            profiles: ProfileReadRepository::new(pool.clone()),
            pool,
        }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ChatStore for ConversationsRepositories {
    async fn find_latest_session(&self, user_id: Uuid) -> Result<Option<ChatSession>> {
        self.sessions.find_latest(user_id).await
    }

    async fn create_session(&self, user_id: Uuid) -> Result<ChatSession> {
        self.sessions.create(user_id).await
    }

    async fn find_session(&self, session_id: Uuid) -> Result<Option<ChatSession>> {
        self.sessions.find(session_id).await
    }

    async fn append_message(
        &self,
        session_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage> {
        self.messages.append(session_id, role, content).await
    }

    async fn list_messages(
        &self,
        session_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>> {
        match limit {
            Some(limit) => self.messages.list_recent(session_id, limit).await,
            None => self.messages.list_by_session(session_id).await,
        }
    }

    async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<SessionSummary>> {
        self.sessions.list_summaries(user_id).await
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<ChatProfile>> {
        self.profiles.find_by_user(user_id).await
    }
}
