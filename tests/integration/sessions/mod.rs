//! Chat session API tests
//!
//! GET/POST /v1/chat/sessions, GET /v1/chat/sessions/{id}

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{authed_request, parse_body, request, ChatTestApp};

async fn send(app: &ChatTestApp, token: &str, message: &str) {
    let req = authed_request(
        Method::POST,
        "/v1/chat/send",
        token,
        Some(json!({ "message": message })),
    );
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

async fn start_session(app: &ChatTestApp, token: &str) -> serde_json::Value {
    let req = authed_request(Method::POST, "/v1/chat/sessions", token, None);
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    parse_body(resp).await
}

#[tokio::test]
async fn test_list_sessions_empty() {
    let app = ChatTestApp::new();
    let (_user_id, token) = app.new_user();

    let req = authed_request(Method::GET, "/v1/chat/sessions", &token, None);
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(parse_body(resp).await, json!([]));
}

#[tokio::test]
async fn test_start_session_returns_empty_session() {
    let app = ChatTestApp::new();
    let (user_id, token) = app.new_user();

    let body = start_session(&app, &token).await;
    assert!(body["id"].as_str().is_some());
    assert_eq!(body["message_count"], 0);
    assert!(body["preview"].is_null());

    assert_eq!(app.store.sessions_of(user_id).len(), 1);
}

#[tokio::test]
async fn test_new_session_receives_next_turn() {
    let app = ChatTestApp::new();
    let (_user_id, token) = app.new_user();

    send(&app, &token, "Sesi lama").await;
    let session = start_session(&app, &token).await;
    send(&app, &token, "Sesi baru").await;

    // History follows the newest session
    let req = authed_request(Method::GET, "/v1/chat/history", &token, None);
    let resp = app.test_router().oneshot(req).await.unwrap();
    let history = parse_body(resp).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["content"], "Sesi baru");
    assert_eq!(history[0]["session_id"], session["id"]);
    assert_eq!(history[0]["sequence"], 1);
}

#[tokio::test]
async fn test_list_sessions_newest_first_with_summary() {
    let app = ChatTestApp::new();
    let (_user_id, token) = app.new_user();

    send(&app, &token, "Sesi pertama").await;
    let newest = start_session(&app, &token).await;

    let req = authed_request(Method::GET, "/v1/chat/sessions", &token, None);
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = parse_body(resp).await;
    let sessions = body.as_array().unwrap();
    assert_eq!(sessions.len(), 2);

    assert_eq!(sessions[0]["id"], newest["id"]);
    assert_eq!(sessions[0]["message_count"], 0);

    assert_eq!(sessions[1]["message_count"], 2);
    assert_eq!(
        sessions[1]["preview"],
        "Mock response to: Sesi pertama"
    );
}

#[tokio::test]
async fn test_get_session_messages() {
    let app = ChatTestApp::new();
    let (user_id, token) = app.new_user();

    send(&app, &token, "Halo").await;
    let session_id = app.store.sessions_of(user_id)[0].id;

    let uri = format!("/v1/chat/sessions/{}", session_id);
    let req = authed_request(Method::GET, &uri, &token, None);
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = parse_body(resp).await;
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["sequence"], 1);
    assert_eq!(messages[1]["sequence"], 2);
}

#[tokio::test]
async fn test_foreign_and_unknown_sessions_look_the_same() {
    let app = ChatTestApp::new();
    let (owner_id, owner_token) = app.new_user();
    let (_other_id, other_token) = app.new_user();

    send(&app, &owner_token, "Punya saya").await;
    let owned = app.store.sessions_of(owner_id)[0].id;

    let uri = format!("/v1/chat/sessions/{}", owned);
    let req = authed_request(Method::GET, &uri, &other_token, None);
    let foreign = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
    let foreign_body = parse_body(foreign).await;

    let uri = format!("/v1/chat/sessions/{}", Uuid::new_v4());
    let req = authed_request(Method::GET, &uri, &other_token, None);
    let unknown = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    let unknown_body = parse_body(unknown).await;

    assert_eq!(foreign_body, unknown_body);
    assert_eq!(foreign_body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_session_id_is_uniform_not_found() {
    let app = ChatTestApp::new();
    let (_user_id, token) = app.new_user();

    let req = authed_request(Method::GET, "/v1/chat/sessions/not-a-uuid", &token, None);
    let malformed = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
    assert_eq!(malformed.headers()["content-type"], "application/json");
    let malformed_body = parse_body(malformed).await;

    let uri = format!("/v1/chat/sessions/{}", Uuid::new_v4());
    let req = authed_request(Method::GET, &uri, &token, None);
    let unknown = app.test_router().oneshot(req).await.unwrap();
    let unknown_body = parse_body(unknown).await;

    assert_eq!(malformed_body, unknown_body);
    assert_eq!(malformed_body["error"]["code"], "NOT_FOUND");
    assert!(malformed_body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Session not found"));
}

#[tokio::test]
async fn test_session_routes_require_token() {
    let app = ChatTestApp::new();

    let req = request(Method::GET, "/v1/chat/sessions", None, None);
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = request(Method::POST, "/v1/chat/sessions", None, None);
    let resp = app.test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
