//! Chat turn API handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use pha_auth::AuthUser;
use pha_common::{Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::middleware::ConversationsState;
use crate::domain::entities::{ChatMessage, MessageRole};

/// Rejects empty and whitespace-only text
fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Request for sending a message
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Message text (1-4000 chars, not blank)
    #[validate(
        length(min = 1, max = 4000),
        custom(function = "validate_not_blank", message = "Message is required")
    )]
    pub message: String,
}

/// Message response DTO
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub sequence: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for MessageResponse {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id,
            session_id: m.session_id,
            role: m.role,
            content: m.content,
            sequence: m.sequence,
            created_at: m.created_at,
        }
    }
}

/// Both halves of the turn
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub user_message: MessageResponse,
    pub assistant_message: MessageResponse,
}

/// Send a message in the caller's current session
pub async fn send_message(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>)> {
    let turn = state.manager.submit_turn(ctx.user.id, &req.message).await?;

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            user_message: turn.user_message.into(),
            assistant_message: turn.assistant_message.into(),
        }),
    ))
}

/// Messages of the caller's most recent session
pub async fn get_history(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
) -> Result<Json<Vec<MessageResponse>>> {
    let messages = state.manager.list_history(ctx.user.id).await?;

    let responses: Vec<MessageResponse> = messages.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}
