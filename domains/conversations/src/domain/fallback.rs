//! What the assistant says when the model cannot answer

use pha_common::config::DEFAULT_FALLBACK_TEXT;
use pha_llm::LlmError;

/// Decides whether a model failure is replaced by a canned reply
pub trait FallbackPolicy: Send + Sync {
    fn should_substitute(&self, error: &LlmError) -> bool;

    fn fallback_text(&self) -> &str;
}

/// Substitutes a fixed apology for every model failure
#[derive(Debug, Clone)]
pub struct ApologyFallback {
    text: String,
}

impl ApologyFallback {
    /// Blank text falls back to the built-in apology
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            return Self::default();
        }
        Self { text }
    }
}

impl Default for ApologyFallback {
    fn default() -> Self {
        Self {
            text: DEFAULT_FALLBACK_TEXT.to_string(),
        }
    }
}

impl FallbackPolicy for ApologyFallback {
    fn should_substitute(&self, _error: &LlmError) -> bool {
        true
    }

    fn fallback_text(&self) -> &str {
        &self.text
    }
}
