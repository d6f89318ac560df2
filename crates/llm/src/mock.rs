//! Mock LLM Service Implementation
//!
//! Used by `LlmServiceFactory` when provider is `"mock"` and by tests.
//! Returns deterministic responses, records every request it receives,
//! and can be told to fail.

use std::sync::{Arc, Mutex};

use crate::{CompletionRequest, CompletionResponse, LlmError, LlmService};

#[derive(Debug, Clone)]
enum Behavior {
    Echo,
    Reply(String),
    Fail(fn() -> LlmError),
}

/// Mock LLM service for testing
#[derive(Debug, Clone)]
pub struct MockLlmService {
    behavior: Behavior,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLlmService {
    /// Echoes the current prompt back as `Mock response to: <prompt>`
    pub fn new() -> Self {
        Self {
            behavior: Behavior::Echo,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answers with `reply`
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Reply(reply.into()),
            ..Self::new()
        }
    }

    /// Always fails with the error produced by `make_error`
    pub fn failing(make_error: fn() -> LlmError) -> Self {
        Self {
            behavior: Behavior::Fail(make_error),
            ..Self::new()
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        match self.requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests().pop()
    }

    fn record(&self, request: &CompletionRequest) {
        match self.requests.lock() {
            Ok(mut guard) => guard.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }
    }
}

impl Default for MockLlmService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        tracing::info!(
            history_turns = request.messages.len(),
            "Mock LLM service processing completion request"
        );

        self.record(&request);

        let content = match &self.behavior {
            Behavior::Echo => format!("Mock response to: {}", request.prompt),
            Behavior::Reply(reply) => reply.clone(),
            Behavior::Fail(make_error) => return Err(make_error()),
        };

        let model = if request.model.is_empty() {
            self.default_model().to_string()
        } else {
            request.model
        };

        let input_tokens = request
            .messages
            .iter()
            .map(|m| m.content.len() as i32 / 4)
            .sum::<i32>()
            + request.prompt.len() as i32 / 4;
        let output_tokens = content.len() as i32 / 4;

        Ok(CompletionResponse {
            content,
            model,
            input_tokens,
            output_tokens,
            stop_reason: "STOP".to_string(),
        })
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }
}
