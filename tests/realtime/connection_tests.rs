//! Connection admission and registry tests

use pretty_assertions::assert_eq;

use chat_realtime::application::realtime::GatewayError;
use chat_realtime::presentation::websocket::ConnectionState;

use crate::common::{uid, Fixture, GatedMessages};

#[tokio::test]
async fn test_invalid_credential_leaves_gateway_untouched() {
    let fixture = Fixture::new(GatedMessages::open());
    let _bob = fixture.connect("token-bob").await;

    for credential in [None, Some(""), Some("token-mallory"), Some("not-a-jwt")] {
        let result = fixture.gateway.admit(credential).await;
        assert!(matches!(result, Err(GatewayError::AuthRejected(_))));
    }

    assert_eq!(fixture.gateway.connection_count(), 1);
    assert_eq!(fixture.gateway.registry().user_count(), 1);
    assert!(fixture.gateway.online_users().is_empty());
}

#[tokio::test]
async fn test_every_device_of_a_user_is_resolved() {
    let fixture = Fixture::new(GatedMessages::open());
    let phone = fixture.connect("token-alice").await;
    let laptop = fixture.connect("token-alice").await;
    let _bob = fixture.connect("token-bob").await;

    let resolved = fixture.gateway.registry().resolve(&[uid("alice")]);
    let mut ids: Vec<_> = resolved.iter().map(|h| h.connection_id).collect();
    ids.sort_by_key(|id| id.to_string());
    let mut expected = vec![phone.context.connection_id, laptop.context.connection_id];
    expected.sort_by_key(|id| id.to_string());

    assert_eq!(ids, expected);
    assert_eq!(fixture.gateway.registry().user_count(), 2);
}

#[tokio::test]
async fn test_closed_connection_is_no_longer_resolved() {
    let fixture = Fixture::new(GatedMessages::open());
    let phone = fixture.connect("token-alice").await;
    let laptop = fixture.connect("token-alice").await;
    let laptop_id = laptop.context.connection_id;

    phone.close(&fixture.gateway);

    let resolved = fixture.gateway.registry().resolve(&[uid("alice")]);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].connection_id, laptop_id);

    laptop.close(&fixture.gateway);
    assert!(fixture.gateway.registry().resolve(&[uid("alice")]).is_empty());
    assert!(!fixture.gateway.registry().is_connected(&uid("alice")));
}

#[tokio::test]
async fn test_close_runs_cleanup_once() {
    let fixture = Fixture::new(GatedMessages::open());
    let mut alice = fixture.connect("token-alice").await;
    let id = alice.context.connection_id;

    assert_eq!(alice.session.state(), ConnectionState::Active);
    assert!(alice.session.close());
    assert!(!alice.session.close());

    assert!(fixture.gateway.disconnect(id).is_some());
    assert!(fixture.gateway.disconnect(id).is_none());
    assert_eq!(fixture.gateway.connection_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_users_register_concurrently() {
    use std::sync::Arc;

    use chat_realtime::application::realtime::ConnectionRegistry;
    use chat_realtime::domain::{ConnectionId, Identity};
    use fake::{faker::name::en::Name, Fake};
    use tokio::sync::mpsc;

    let registry = Arc::new(ConnectionRegistry::new());
    let mut tasks = Vec::new();
    for i in 0..50 {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            let name: String = Name().fake();
            let identity = Identity::new(format!("user-{}", i), name);
            let (tx, _rx) = mpsc::channel(1);
            registry.register(identity, ConnectionId::new(), tx)
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap());
    }

    assert_eq!(registry.user_count(), 50);
    assert_eq!(registry.connection_count(), 50);
    assert_eq!(registry.resolve(&[uid("user-7")]).len(), 1);
}
