//! In-memory `ChatStore` for tests and local experiments
//!
//! Mirrors the ordering rules of the Postgres repositories: latest session
//! by `(started_at, id)`, messages by `sequence`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use pha_common::{Error, Result};
use uuid::Uuid;

use super::ChatStore;
use crate::domain::entities::{ChatMessage, ChatProfile, ChatSession, MessageRole, SessionSummary};

#[derive(Default)]
struct Inner {
    sessions: Vec<ChatSession>,
    messages: Vec<ChatMessage>,
    profiles: HashMap<Uuid, ChatProfile>,
    last_timestamp: Option<DateTime<Utc>>,
    unavailable: bool,
}

impl Inner {
    /// Strictly increasing clock so ordering never depends on timer resolution
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(Error::Internal("Chat store unavailable".to_string()));
        }
        Ok(())
    }

    fn session_messages(&self, session_id: Uuid) -> Vec<ChatMessage> {
        let mut messages: Vec<ChatMessage> = self
            .messages
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.sequence);
        messages
    }
}

#[derive(Default)]
pub struct InMemoryChatStore {
    inner: Mutex<Inner>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Seed the profile read model for a user
    pub fn insert_profile(&self, user_id: Uuid, profile: ChatProfile) {
        self.lock().profiles.insert(user_id, profile);
    }

    /// While set, every operation fails as a storage error would
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Every session ever created for a user, oldest first
    pub fn sessions_of(&self, user_id: Uuid) -> Vec<ChatSession> {
        let mut sessions: Vec<ChatSession> = self
            .lock()
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| (s.started_at, s.id));
        sessions
    }

    pub fn messages_of(&self, session_id: Uuid) -> Vec<ChatMessage> {
        self.lock().session_messages(session_id)
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn find_latest_session(&self, user_id: Uuid) -> Result<Option<ChatSession>> {
        let inner = self.lock();
        inner.check_available()?;

        Ok(inner
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| (s.started_at, s.id))
            .cloned())
    }

    async fn create_session(&self, user_id: Uuid) -> Result<ChatSession> {
        let mut inner = self.lock();
        inner.check_available()?;

        let mut session = ChatSession::new(user_id);
        session.started_at = inner.tick();
        inner.sessions.push(session.clone());

        Ok(session)
    }

    async fn find_session(&self, session_id: Uuid) -> Result<Option<ChatSession>> {
        let inner = self.lock();
        inner.check_available()?;

        Ok(inner.sessions.iter().find(|s| s.id == session_id).cloned())
    }

    async fn append_message(
        &self,
        session_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage> {
        let mut inner = self.lock();
        inner.check_available()?;

        if !inner.sessions.iter().any(|s| s.id == session_id) {
            return Err(Error::NotFound("Session not found".to_string()));
        }

        let next_sequence = inner
            .messages
            .iter()
            .filter(|m| m.session_id == session_id)
            .map(|m| m.sequence)
            .max()
            .unwrap_or(0)
            + 1;

        let mut message = ChatMessage::new(session_id, role, content.to_string(), next_sequence)?;
        message.created_at = inner.tick();
        inner.messages.push(message.clone());

        Ok(message)
    }

    async fn list_messages(
        &self,
        session_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>> {
        let inner = self.lock();
        inner.check_available()?;

        let mut messages = inner.session_messages(session_id);
        if let Some(limit) = limit {
            let skip = messages.len().saturating_sub(limit);
            messages.drain(..skip);
        }

        Ok(messages)
    }

    async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<SessionSummary>> {
        let inner = self.lock();
        inner.check_available()?;

        let mut sessions: Vec<&ChatSession> = inner
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .collect();
        sessions.sort_by_key(|s| std::cmp::Reverse((s.started_at, s.id)));

        Ok(sessions
            .into_iter()
            .map(|s| {
                let messages = inner.session_messages(s.id);
                SessionSummary::new(
                    s.id,
                    s.started_at,
                    messages.last().map(|m| m.content.as_str()),
                    messages.len() as i64,
                )
            })
            .collect())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<ChatProfile>> {
        let inner = self.lock();
        inner.check_available()?;

        Ok(inner.profiles.get(&user_id).cloned())
    }
}
