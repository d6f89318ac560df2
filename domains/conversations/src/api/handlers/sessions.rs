//! Session API handlers

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use pha_auth::AuthUser;
use pha_common::{Error, Result};
use serde::Serialize;
use uuid::Uuid;

use super::chat::MessageResponse;
use crate::api::middleware::ConversationsState;
use crate::domain::entities::{ChatSession, SessionSummary};

/// Session response DTO
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub preview: Option<String>,
    pub message_count: i64,
}

impl From<SessionSummary> for SessionResponse {
    fn from(s: SessionSummary) -> Self {
        Self {
            id: s.id,
            started_at: s.started_at,
            preview: s.preview,
            message_count: s.message_count,
        }
    }
}

impl From<ChatSession> for SessionResponse {
    fn from(s: ChatSession) -> Self {
        Self {
            id: s.id,
            started_at: s.started_at,
            preview: None,
            message_count: 0,
        }
    }
}

fn session_not_found() -> Error {
    Error::NotFound("Session not found".to_string())
}

/// List the caller's sessions, newest first
pub async fn list_sessions(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
) -> Result<Json<Vec<SessionResponse>>> {
    let sessions = state.manager.list_sessions(ctx.user.id).await?;

    let responses: Vec<SessionResponse> = sessions.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Start a new session
pub async fn start_session(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let session = state.manager.start_new_session(ctx.user.id).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Messages of one of the caller's sessions
pub async fn get_session_messages(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<MessageResponse>>> {
    // A malformed id cannot name any session
    let Path(id) = id.map_err(|e| {
        tracing::debug!(error = %e, "Rejected malformed session id");
        session_not_found()
    })?;

    let messages = state
        .manager
        .get_session_messages(ctx.user.id, id)
        .await?
        .ok_or_else(session_not_found)?;

    let responses: Vec<MessageResponse> = messages.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}
