//! WebSocket Endpoint Tests
//!
//! Drive `/socket` over a real listener with a WebSocket client.

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::common::{next_event, open_socket, send_event, uid, wait_until, TestApp};

fn assert_unauthorized(result: Result<crate::common::Socket, WsError>) {
    match result {
        Err(WsError::Http(response)) => assert_eq!(response.status(), 401),
        Err(other) => panic!("expected HTTP 401, got {}", other),
        Ok(_) => panic!("connection should have been rejected"),
    }
}

#[tokio::test]
async fn test_rejected_handshake_creates_no_state() {
    let app = TestApp::new().await;
    let addr = app.spawn_server().await;

    assert_unauthorized(open_socket(addr, &[]).await);
    assert_unauthorized(open_socket(addr, &[("Cookie", "jwt=token-mallory")]).await);
    assert_unauthorized(open_socket(addr, &[("Authorization", "Bearer nope")]).await);

    let gateway = &app.fixture.gateway;
    assert_eq!(gateway.connection_count(), 0);
    assert_eq!(gateway.registry().user_count(), 0);
    assert!(gateway.online_users().is_empty());
}

#[tokio::test]
async fn test_cookie_is_used_despite_non_bearer_authorization() {
    let app = TestApp::new().await;
    let addr = app.spawn_server().await;

    let _socket = open_socket(
        addr,
        &[
            ("Cookie", "jwt=token-alice"),
            ("Authorization", "Basic YWxpY2U6c2VjcmV0"),
        ],
    )
    .await
    .expect("cookie should be accepted");

    let gateway = &app.fixture.gateway;
    wait_until(|| gateway.registry().is_connected(&uid("alice"))).await;
}

#[tokio::test]
async fn test_bearer_header_is_accepted_without_cookie() {
    let app = TestApp::new().await;
    let addr = app.spawn_server().await;

    let _socket = open_socket(addr, &[("Authorization", "Bearer token-bob")])
        .await
        .expect("bearer token should be accepted");

    let gateway = &app.fixture.gateway;
    wait_until(|| gateway.registry().is_connected(&uid("bob"))).await;
}

#[tokio::test]
async fn test_typing_relay_between_sockets_keeps_order() {
    let app = TestApp::new().await;
    let addr = app.spawn_server().await;
    let mut alice = open_socket(addr, &[("Cookie", "jwt=token-alice")]).await.unwrap();
    let mut bob = open_socket(addr, &[("Cookie", "jwt=token-bob")]).await.unwrap();
    let gateway = &app.fixture.gateway;
    wait_until(|| gateway.connection_count() == 2).await;

    for event in ["START_TYPING", "STOP_TYPING"] {
        send_event(
            &mut alice,
            json!({"event": event, "data": {"chatId": "dm", "members": ["alice", "bob"]}}),
        )
        .await;
    }

    assert_eq!(
        next_event(&mut bob).await,
        json!({"event": "START_TYPING", "data": {"chatId": "dm"}})
    );
    assert_eq!(
        next_event(&mut bob).await,
        json!({"event": "STOP_TYPING", "data": {"chatId": "dm"}})
    );
}

#[tokio::test]
async fn test_closing_socket_broadcasts_presence_without_user() {
    let app = TestApp::new().await;
    let addr = app.spawn_server().await;
    let mut alice = open_socket(addr, &[("Cookie", "jwt=token-alice")]).await.unwrap();
    let mut bob = open_socket(addr, &[("Cookie", "jwt=token-bob")]).await.unwrap();
    let gateway = &app.fixture.gateway;
    wait_until(|| gateway.connection_count() == 2).await;

    send_event(
        &mut alice,
        json!({"event": "USER_ONLINE", "data": {"userId": "alice", "members": ["bob"]}}),
    )
    .await;
    assert_eq!(
        next_event(&mut bob).await,
        json!({"event": "ONLINE_USERS", "data": ["alice"]})
    );

    alice.close(None).await.unwrap();

    assert_eq!(
        next_event(&mut bob).await,
        json!({"event": "ONLINE_USERS", "data": []})
    );
    wait_until(|| gateway.connection_count() == 1).await;
    assert!(!gateway.is_online(&uid("alice")));
}
