//! Conversations domain: chat sessions, messages and the turn flow

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{ChatMessage, ChatProfile, ChatSession, MessageRole, SessionSummary};
pub use domain::fallback::{ApologyFallback, FallbackPolicy};
pub use domain::manager::{ConversationManager, ConversationSettings, Turn};

// Re-export repository types
pub use repository::{ChatStore, ConversationsRepositories};

#[cfg(feature = "test-support")]
pub use repository::memory::InMemoryChatStore;

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
