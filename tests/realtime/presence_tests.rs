//! Presence tests

use pretty_assertions::assert_eq;
use serde_json::json;

use chat_realtime::domain::{ServerEvent, UserId};

use crate::common::{uid, Fixture, GatedMessages, TestClient};

fn online_users(client: &mut TestClient) -> Vec<Vec<UserId>> {
    client
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            ServerEvent::OnlineUsers(users) => Some(users),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_online_snapshot_contains_every_online_user() {
    let fixture = Fixture::new(GatedMessages::open());
    let alice = fixture.connect("token-alice").await;
    let mut bob = fixture.connect("token-bob").await;

    bob.send(
        &fixture.gateway,
        json!({"event": "USER_ONLINE", "data": {"userId": "bob", "members": ["alice", "bob"]}}),
    )
    .await;
    alice
        .send(
            &fixture.gateway,
            json!({"event": "USER_ONLINE", "data": {"userId": "alice", "members": ["bob"]}}),
        )
        .await;

    assert_eq!(
        online_users(&mut bob),
        vec![vec![uid("bob")], vec![uid("alice"), uid("bob")]]
    );
    assert!(fixture.gateway.is_online(&uid("alice")));
}

#[tokio::test]
async fn test_presence_applies_to_the_connection_identity() {
    let fixture = Fixture::new(GatedMessages::open());
    let mallory = fixture.connect("token-carol").await;
    let mut bob = fixture.connect("token-bob").await;

    mallory
        .send(
            &fixture.gateway,
            json!({"event": "USER_ONLINE", "data": {"userId": "bob", "members": ["bob"]}}),
        )
        .await;

    assert_eq!(online_users(&mut bob), vec![vec![uid("carol")]]);
    assert!(!fixture.gateway.is_online(&uid("bob")));
}

#[tokio::test]
async fn test_user_offline_removes_user_from_snapshot() {
    let fixture = Fixture::new(GatedMessages::open());
    let alice = fixture.connect("token-alice").await;
    let mut bob = fixture.connect("token-bob").await;

    alice
        .send(
            &fixture.gateway,
            json!({"event": "USER_ONLINE", "data": {"members": ["bob"]}}),
        )
        .await;
    alice
        .send(
            &fixture.gateway,
            json!({"event": "USER_OFFLINE", "data": {"members": ["bob"]}}),
        )
        .await;

    assert_eq!(online_users(&mut bob), vec![vec![uid("alice")], vec![]]);
    // Marking offline does not close the connection
    assert!(fixture.gateway.registry().is_connected(&uid("alice")));
}

#[tokio::test]
async fn test_closing_last_connection_broadcasts_snapshot_without_user() {
    let fixture = Fixture::new(GatedMessages::open());
    let alice_phone = fixture.connect("token-alice").await;
    let alice_laptop = fixture.connect("token-alice").await;
    let mut bob = fixture.connect("token-bob").await;
    let mut carol = fixture.connect("token-carol").await;

    for client in [&alice_phone, &bob] {
        client
            .send(
                &fixture.gateway,
                json!({"event": "USER_ONLINE", "data": {"members": []}}),
            )
            .await;
    }

    // Another device is still connected, so alice stays online
    alice_phone.close(&fixture.gateway);
    assert!(fixture.gateway.is_online(&uid("alice")));
    assert!(bob.drain().is_empty());

    alice_laptop.close(&fixture.gateway);
    assert!(!fixture.gateway.is_online(&uid("alice")));
    assert_eq!(online_users(&mut bob), vec![vec![uid("bob")]]);
    assert_eq!(online_users(&mut carol), vec![vec![uid("bob")]]);
}
