//! Route definitions for Conversations domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{chat, sessions};
use super::middleware::ConversationsState;

/// Sending turns and reading the current session
fn chat_routes() -> Router<ConversationsState> {
    Router::new()
        .route("/v1/chat/send", post(chat::send_message))
        .route("/v1/chat/history", get(chat::get_history))
}

fn session_routes() -> Router<ConversationsState> {
    Router::new()
        .route(
            "/v1/chat/sessions",
            get(sessions::list_sessions).post(sessions::start_session),
        )
        .route("/v1/chat/sessions/{id}", get(sessions::get_session_messages))
}

/// Create all Conversations domain API routes
pub fn routes() -> Router<ConversationsState> {
    Router::new().merge(chat_routes()).merge(session_routes())
}
