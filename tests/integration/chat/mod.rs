//! Chat turn API tests
//!
//! POST /v1/chat/send, GET /v1/chat/history

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use pha_common::config::DEFAULT_FALLBACK_TEXT;
use pha_conversations::{ChatProfile, FallbackPolicy};
use pha_llm::{LlmError, MockLlmService};
use serde_json::json;
use tower::ServiceExt;

use crate::common::{authed_request, parse_body, request, ChatTestApp};

/// Policy that lets every model failure through
struct NeverSubstitute;

impl FallbackPolicy for NeverSubstitute {
    fn should_substitute(&self, _error: &LlmError) -> bool {
        false
    }

    fn fallback_text(&self) -> &str {
        ""
    }
}

// ---------------------------------------------------------------------------
// POST /v1/chat/send
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_send_message_returns_both_halves_of_turn() {
    let app = ChatTestApp::new();
    let (_user_id, token) = app.new_user();

    let req = authed_request(
        Method::POST,
        "/v1/chat/send",
        &token,
        Some(json!({ "message": "Saya susah tidur" })),
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = parse_body(resp).await;
    assert_eq!(body["user_message"]["role"], "user");
    assert_eq!(body["user_message"]["content"], "Saya susah tidur");
    assert_eq!(body["user_message"]["sequence"], 1);
    assert_eq!(body["assistant_message"]["role"], "ai");
    assert_eq!(
        body["assistant_message"]["content"],
        "Mock response to: Saya susah tidur"
    );
    assert_eq!(body["assistant_message"]["sequence"], 2);
    assert_eq!(
        body["user_message"]["session_id"],
        body["assistant_message"]["session_id"]
    );
}

#[tokio::test]
async fn test_send_message_requires_token() {
    let app = ChatTestApp::new();

    let req = request(
        Method::POST,
        "/v1/chat/send",
        None,
        Some(json!({ "message": "Halo" })),
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(app.llm.requests().is_empty());
}

#[tokio::test]
async fn test_send_message_rejects_invalid_token() {
    let app = ChatTestApp::new();

    let req = authed_request(
        Method::POST,
        "/v1/chat/send",
        "not-a-jwt",
        Some(json!({ "message": "Halo" })),
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = parse_body(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_send_blank_message_rejected_without_side_effects() {
    let app = ChatTestApp::new();
    let (user_id, token) = app.new_user();

    for message in ["", "   \n\t"] {
        let req = authed_request(
            Method::POST,
            "/v1/chat/send",
            &token,
            Some(json!({ "message": message })),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    assert!(app.store.sessions_of(user_id).is_empty());
    assert!(app.llm.requests().is_empty());
}

#[tokio::test]
async fn test_send_missing_field_rejected() {
    let app = ChatTestApp::new();
    let (_user_id, token) = app.new_user();

    let req = authed_request(Method::POST, "/v1/chat/send", &token, Some(json!({})));
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_overlong_message_rejected() {
    let app = ChatTestApp::new();
    let (_user_id, token) = app.new_user();

    let req = authed_request(
        Method::POST,
        "/v1/chat/send",
        &token,
        Some(json!({ "message": "a".repeat(4001) })),
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_turns_continue_in_same_session() {
    let app = ChatTestApp::new();
    let (user_id, token) = app.new_user();

    for text in ["Pertama", "Kedua"] {
        let req = authed_request(
            Method::POST,
            "/v1/chat/send",
            &token,
            Some(json!({ "message": text })),
        );
        let resp = app.test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let sessions = app.store.sessions_of(user_id);
    assert_eq!(sessions.len(), 1);

    let messages = app.store.messages_of(sessions[0].id);
    let sequences: Vec<i32> = messages.iter().map(|m| m.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3, 4]);

    // Second turn sees the first turn as history, not the current text
    let last = app.llm.last_request().unwrap();
    assert_eq!(last.prompt, "Kedua");
    assert_eq!(last.messages.len(), 2);
    assert_eq!(last.messages[0].content, "Pertama");
}

#[tokio::test]
async fn test_send_uses_profile_for_personalization() {
    let app = ChatTestApp::new();
    let (user_id, token) = app.new_user();
    app.store.insert_profile(
        user_id,
        ChatProfile {
            display_name: Some("Sari".to_string()),
            age: Some(29),
            language: "id".to_string(),
        },
    );

    let req = authed_request(
        Method::POST,
        "/v1/chat/send",
        &token,
        Some(json!({ "message": "Halo" })),
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let system_prompt = app.llm.last_request().unwrap().system_prompt.unwrap();
    assert!(system_prompt.contains("Nama=Sari"));
    assert!(system_prompt.contains("Usia=29"));
}

#[tokio::test]
async fn test_model_failure_answered_with_fallback() {
    let app = ChatTestApp::with_llm(MockLlmService::failing(|| LlmError::Timeout));
    let (user_id, token) = app.new_user();

    let req = authed_request(
        Method::POST,
        "/v1/chat/send",
        &token,
        Some(json!({ "message": "Halo" })),
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = parse_body(resp).await;
    assert_eq!(body["assistant_message"]["content"], DEFAULT_FALLBACK_TEXT);

    let session = &app.store.sessions_of(user_id)[0];
    assert_eq!(app.store.messages_of(session.id).len(), 2);
}

#[tokio::test]
async fn test_model_failure_without_fallback_is_bad_gateway() {
    let app = ChatTestApp::with_policy(
        MockLlmService::failing(|| LlmError::RateLimit),
        Arc::new(NeverSubstitute),
    );
    let (user_id, token) = app.new_user();

    let req = authed_request(
        Method::POST,
        "/v1/chat/send",
        &token,
        Some(json!({ "message": "Halo" })),
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body = parse_body(resp).await;
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");

    // The user's text is kept even though no reply was stored
    let session = &app.store.sessions_of(user_id)[0];
    let messages = app.store.messages_of(session.id);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "Halo");
}

#[tokio::test]
async fn test_storage_failure_is_internal_error_with_generic_message() {
    let app = ChatTestApp::new();
    let (_user_id, token) = app.new_user();
    app.store.set_unavailable(true);

    let req = authed_request(
        Method::POST,
        "/v1/chat/send",
        &token,
        Some(json!({ "message": "Halo" })),
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.llm.requests().is_empty());
}

// ---------------------------------------------------------------------------
// GET /v1/chat/history
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_history_empty_for_new_user() {
    let app = ChatTestApp::new();
    let (_user_id, token) = app.new_user();

    let req = authed_request(Method::GET, "/v1/chat/history", &token, None);
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = parse_body(resp).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_history_lists_current_session_in_order() {
    let app = ChatTestApp::with_llm(MockLlmService::with_reply("Tarik napas pelan-pelan."));
    let (_user_id, token) = app.new_user();

    let req = authed_request(
        Method::POST,
        "/v1/chat/send",
        &token,
        Some(json!({ "message": "Saya cemas" })),
    );
    app.test_router().oneshot(req).await.unwrap();

    let req = authed_request(Method::GET, "/v1/chat/history", &token, None);
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = parse_body(resp).await;
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "Saya cemas");
    assert_eq!(messages[1]["role"], "ai");
    assert_eq!(messages[1]["content"], "Tarik napas pelan-pelan.");
}

#[tokio::test]
async fn test_history_is_per_user() {
    let app = ChatTestApp::new();
    let (_alice, alice_token) = app.new_user();
    let (_bob, bob_token) = app.new_user();

    let req = authed_request(
        Method::POST,
        "/v1/chat/send",
        &alice_token,
        Some(json!({ "message": "Rahasia" })),
    );
    app.test_router().oneshot(req).await.unwrap();

    let req = authed_request(Method::GET, "/v1/chat/history", &bob_token, None);
    let resp = app.test_router().oneshot(req).await.unwrap();
    let body = parse_body(resp).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_history_requires_token() {
    let app = ChatTestApp::new();

    let req = request(Method::GET, "/v1/chat/history", None, None);
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
