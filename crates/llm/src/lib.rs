//! LLM service abstraction
//!
//! `LlmService` is the seam between the chat domain and the generative
//! model. `GeminiService` talks to the Google Generative Language API,
//! `MockLlmService` answers deterministically for local runs and tests.

use std::sync::Arc;

use pha_common::Config;
use serde::{Deserialize, Serialize};

mod gemini;
mod mock;

pub use gemini::GeminiService;
pub use mock::MockLlmService;

/// Role of a prior turn in the conversation history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    User,
    Assistant,
}

/// A prior turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

impl LlmMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::Assistant,
            content: content.into(),
        }
    }
}

/// A single completion call.
///
/// `messages` is the history window, oldest first. `prompt` is the
/// current user text and is sent after the history.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Empty string selects the service default
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<LlmMessage>,
    pub prompt: String,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub stop_reason: String,
}

/// Errors from the model gateway
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("LLM request failed: {0}")]
    Request(String),

    #[error("LLM request timed out")]
    Timeout,

    #[error("LLM rate limit exceeded")]
    RateLimit,

    #[error("LLM response error: {0}")]
    Response(String),

    #[error("LLM returned no text")]
    EmptyResponse,
}

/// Model gateway
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    fn default_model(&self) -> &str;
}

/// LLM provider settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// `gemini` or `mock`
    pub provider: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub default_model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl From<&Config> for LlmConfig {
    fn from(config: &Config) -> Self {
        Self {
            provider: config.llm_provider.clone(),
            api_key: config.gemini_api_key.clone().unwrap_or_default(),
            base_url: config.gemini_base_url.clone(),
            default_model: config.llm_model.clone(),
            max_tokens: config.llm_max_tokens,
            timeout_secs: config.llm_timeout_secs,
        }
    }
}

/// Builds the configured `LlmService`
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    pub fn create(config: LlmConfig) -> Result<Arc<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "gemini" => {
                tracing::info!(model = %config.default_model, "Using Gemini LLM service");
                Ok(Arc::new(GeminiService::new(config)?))
            }
            "mock" => {
                tracing::warn!("Using mock LLM service; replies are canned");
                Ok(Arc::new(MockLlmService::new()))
            }
            other => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}",
                other
            ))),
        }
    }
}
