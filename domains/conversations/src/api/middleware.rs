//! Conversations domain state and auth backend integration

use axum::extract::FromRef;
use pha_auth::AuthBackend;
use std::sync::Arc;

use crate::domain::manager::ConversationManager;

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub manager: Arc<ConversationManager>,
    pub auth: AuthBackend,
}

impl FromRef<ConversationsState> for AuthBackend {
    fn from_ref(state: &ConversationsState) -> Self {
        state.auth.clone()
    }
}
