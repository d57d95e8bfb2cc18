//! Internal API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use chat_realtime::domain::events::{NEW_MESSAGE, NEW_MESSAGE_ALERT, NEW_REQUEST, REFETCH_CHATS};

use crate::common::{json_body, TestApp, INTERNAL_KEY};

#[tokio::test]
async fn test_internal_routes_require_api_key() {
    let app = TestApp::new().await;

    let missing = app.get("/internal/presence").await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong = app.get_auth("/internal/presence", "not-the-key").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(wrong).await["code"], 10003);
}

#[tokio::test]
async fn test_key_of_same_length_but_different_bytes_is_rejected() {
    let app = TestApp::new().await;
    let mut forged = INTERNAL_KEY.to_string();
    forged.pop();
    forged.push('X');

    let forged = app.get_auth("/internal/presence", &forged).await;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);

    let prefix = app
        .get_auth("/internal/presence", &INTERNAL_KEY[..INTERNAL_KEY.len() - 1])
        .await;
    assert_eq!(prefix.status(), StatusCode::UNAUTHORIZED);

    let valid = app.get_auth("/internal/presence", INTERNAL_KEY).await;
    assert_eq!(valid.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_emit_event_without_data() {
    let app = TestApp::new().await;
    let mut bob = app.fixture.connect("token-bob").await;

    let response = app
        .post_json_auth(
            "/internal/events",
            &json!({"users": ["bob"], "payload": {"event": "NEW_REQUEST"}}),
            INTERNAL_KEY,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["delivered"], 1);
    assert_eq!(bob.event_names(), vec![NEW_REQUEST]);
}

#[tokio::test]
async fn test_emit_event_reaches_connected_users() {
    let app = TestApp::new().await;
    let mut alice = app.fixture.connect("token-alice").await;
    let mut bob = app.fixture.connect("token-bob").await;

    let response = app
        .post_json_auth(
            "/internal/events",
            &json!({
                "users": ["alice", "dave"],
                "payload": {"event": "REFETCH_CHATS", "data": {}}
            }),
            INTERNAL_KEY,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["delivered"], 1);
    assert_eq!(json["failed"], 0);
    assert_eq!(alice.event_names(), vec![REFETCH_CHATS]);
    assert!(bob.drain().is_empty());
}

#[tokio::test]
async fn test_emit_rejects_presence_snapshots() {
    let app = TestApp::new().await;

    let response = app
        .post_json_auth(
            "/internal/events",
            &json!({
                "users": ["alice"],
                "payload": {"event": "ONLINE_USERS", "data": ["alice"]}
            }),
            INTERNAL_KEY,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_message_on_behalf_of_user() {
    let app = TestApp::new().await;
    let mut bob = app.fixture.connect("token-bob").await;

    let response = app
        .post_json_auth(
            "/internal/messages",
            &json!({
                "senderId": "alice",
                "chatId": "dm",
                "attachments": [
                    {"public_id": "img_1", "url": "https://cdn.example.com/img_1.png"}
                ]
            }),
            INTERNAL_KEY,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["message"]["sender"]["_id"], "alice");
    assert_eq!(json["message"]["chat"], "dm");
    assert_eq!(json["delivered"], 1);
    assert_eq!(bob.event_names(), vec![NEW_MESSAGE, NEW_MESSAGE_ALERT]);
}

#[tokio::test]
async fn test_send_message_to_foreign_chat_is_forbidden() {
    let app = TestApp::new().await;

    let response = app
        .post_json_auth(
            "/internal/messages",
            &json!({"senderId": "carol", "chatId": "dm", "content": "hi"}),
            INTERNAL_KEY,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_presence_lists_online_users() {
    let app = TestApp::new().await;
    let alice = app.fixture.connect("token-alice").await;
    alice
        .send(
            &app.fixture.gateway,
            json!({"event": "USER_ONLINE", "data": {"members": []}}),
        )
        .await;

    let response = app.get_auth("/internal/presence", INTERNAL_KEY).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["online_users"], json!(["alice"]));
    assert_eq!(json["connections"], 1);
}
