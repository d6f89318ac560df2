//! Conversation Manager
//!
//! Runs one chat turn end to end: pick the session, persist the user's
//! text, give the model a bounded window of prior turns, persist the reply.
//! Holds no per-user state between calls; the store is the source of truth.

use std::sync::Arc;

use pha_common::config::DEFAULT_CONTEXT_WINDOW;
use pha_common::{Config, Error, Result};
use pha_llm::{CompletionRequest, LlmError, LlmService};
use uuid::Uuid;

use crate::domain::context::{self, DEFAULT_PERSONA};
use crate::domain::entities::{ChatMessage, ChatSession, MessageRole, SessionSummary};
use crate::domain::fallback::FallbackPolicy;
use crate::repository::ChatStore;

/// Tunables for context assembly and the model call
#[derive(Debug, Clone)]
pub struct ConversationSettings {
    /// Prior turns sent with each request; values below 1 act as 1
    pub context_window: usize,
    /// Empty selects the model service default
    pub model: String,
    pub max_tokens: Option<u32>,
    pub persona: String,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
            model: String::new(),
            max_tokens: None,
            persona: DEFAULT_PERSONA.to_string(),
        }
    }
}

impl From<&Config> for ConversationSettings {
    fn from(config: &Config) -> Self {
        Self {
            context_window: config.chat_context_window,
            model: config.llm_model.clone(),
            max_tokens: Some(config.llm_max_tokens),
            persona: DEFAULT_PERSONA.to_string(),
        }
    }
}

/// Both halves of a completed turn, as persisted
#[derive(Debug, Clone)]
pub struct Turn {
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
    /// True when the reply is the fallback text rather than model output
    pub substituted: bool,
}

pub struct ConversationManager {
    store: Arc<dyn ChatStore>,
    llm: Arc<dyn LlmService>,
    fallback: Arc<dyn FallbackPolicy>,
    settings: ConversationSettings,
}

impl ConversationManager {
    pub fn new(
        store: Arc<dyn ChatStore>,
        llm: Arc<dyn LlmService>,
        fallback: Arc<dyn FallbackPolicy>,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            store,
            llm,
            fallback,
            settings,
        }
    }

    /// Record the user's text and the assistant's reply in the user's
    /// current session, creating the session if there is none.
    ///
    /// The user message is stored before the model is called, so it
    /// survives a model failure. Storage errors abort the turn.
    pub async fn submit_turn(&self, user_id: Uuid, text: &str) -> Result<Turn> {
        if text.trim().is_empty() {
            return Err(Error::Validation("Message cannot be empty".to_string()));
        }

        let session = self.resolve_session(user_id).await?;

        let user_message = self
            .store
            .append_message(session.id, MessageRole::User, text)
            .await?;

        let request = self.build_request(user_id, &session, &user_message).await?;
        let history_turns = request.messages.len();

        let (reply, substituted) = match self.invoke_model(request).await {
            Ok(content) => (content, false),
            Err(e) if self.fallback.should_substitute(&e) => {
                tracing::warn!(
                    error = %e,
                    user_id = %user_id,
                    session_id = %session.id,
                    "Model call failed, replying with fallback text"
                );
                (self.fallback.fallback_text().to_string(), true)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    user_id = %user_id,
                    session_id = %session.id,
                    "Model call failed"
                );
                return Err(Error::Upstream(e.to_string()));
            }
        };

        let assistant_message = self
            .store
            .append_message(session.id, MessageRole::Ai, &reply)
            .await?;

        tracing::info!(
            user_id = %user_id,
            session_id = %session.id,
            sequence = assistant_message.sequence,
            history_turns,
            substituted,
            "Chat turn completed"
        );

        Ok(Turn {
            user_message,
            assistant_message,
            substituted,
        })
    }

    /// Messages of the user's most recent session, oldest first
    pub async fn list_history(&self, user_id: Uuid) -> Result<Vec<ChatMessage>> {
        match self.store.find_latest_session(user_id).await? {
            Some(session) => self.store.list_messages(session.id, None).await,
            None => Ok(Vec::new()),
        }
    }

    /// All of the user's sessions, newest first
    pub async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<SessionSummary>> {
        self.store.list_sessions(user_id).await
    }

    /// Messages of one session; `None` when it does not exist or is not the user's
    pub async fn get_session_messages(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Option<Vec<ChatMessage>>> {
        let session = match self.store.find_session(session_id).await? {
            Some(session) if session.user_id == user_id => session,
            _ => return Ok(None),
        };

        let messages = self.store.list_messages(session.id, None).await?;
        Ok(Some(messages))
    }

    /// Start a fresh session; it becomes the target of the next turn
    pub async fn start_new_session(&self, user_id: Uuid) -> Result<ChatSession> {
        let session = self.store.create_session(user_id).await?;
        tracing::info!(user_id = %user_id, session_id = %session.id, "Started new chat session");
        Ok(session)
    }

    async fn resolve_session(&self, user_id: Uuid) -> Result<ChatSession> {
        if let Some(session) = self.store.find_latest_session(user_id).await? {
            return Ok(session);
        }

        let session = self.store.create_session(user_id).await?;
        tracing::info!(user_id = %user_id, session_id = %session.id, "Created first chat session");
        Ok(session)
    }

    async fn build_request(
        &self,
        user_id: Uuid,
        session: &ChatSession,
        current: &ChatMessage,
    ) -> Result<CompletionRequest> {
        let window = self.settings.context_window.max(1);

        let profile = self.store.get_profile(user_id).await?;

        // One extra so the window is still full after dropping the current message
        let recent = self
            .store
            .list_messages(session.id, Some(window + 1))
            .await?;

        Ok(CompletionRequest {
            model: self.settings.model.clone(),
            system_prompt: Some(context::system_instruction(
                &self.settings.persona,
                profile.as_ref(),
            )),
            messages: context::history_window(recent, current.id, window),
            prompt: current.content.clone(),
            max_tokens: self.settings.max_tokens,
        })
    }

    async fn invoke_model(&self, request: CompletionRequest) -> std::result::Result<String, LlmError> {
        let response = self.llm.complete(request).await?;
        if response.content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(response.content)
    }
}
