//! Delivery ordering, offline sends and eviction.

use std::time::Duration;

use bytes::Bytes;
use serde_json::json;

use socialhub_core::config::RealtimeConfig;
use socialhub_core::types::UserId;

use crate::helpers::TestHub;

#[tokio::test]
async fn test_send_to_offline_user_is_noop() {
    let hub = TestHub::new();
    let delivered = hub
        .engine
        .hub
        .send_to_user(UserId::new(), Bytes::from_static(b"{}"))
        .await;
    assert_eq!(delivered, 0);
    assert_eq!(hub.engine.hub.client_count().await, 0);
    assert_eq!(hub.engine.hub.user_count().await, 0);
}

#[tokio::test]
async fn test_chat_messages_arrive_in_send_order() {
    let hub = TestHub::new();
    let (alice, bob) = (UserId::new(), UserId::new());
    let alice_session = hub.connect(alice).await;
    let mut bob_session = hub.connect(bob).await;

    for i in 0..50 {
        alice_session.send(json!({
            "type": "chat_message",
            "recipient_id": bob,
            "text": format!("message {i}"),
        }));
    }

    for i in 0..50 {
        let frame = bob_session.wait_for("chat_message").await;
        assert_eq!(frame["text"], format!("message {i}"));
        assert_eq!(frame["sender_id"], alice.to_string());
    }
}

#[tokio::test]
async fn test_full_queue_evicts_without_blocking_others() {
    let hub = TestHub::with_config(RealtimeConfig {
        client_queue_capacity: 4,
        ..RealtimeConfig::default()
    });
    let (slow_user, watcher) = (UserId::new(), UserId::new());
    hub.users.befriend(slow_user, watcher);

    let mut watcher_session = hub.connect(watcher).await;
    watcher_session.drain().await;

    // Registered but never drained: nobody reads this queue.
    let (slow, _queue) = hub.engine.connect(slow_user).await;
    assert_eq!(watcher_session.wait_for("presence").await["status"], "online");

    let sends = async {
        for _ in 0..5 {
            hub.engine
                .hub
                .send_to_user(slow_user, Bytes::from_static(b"{}"))
                .await;
        }
    };
    tokio::time::timeout(Duration::from_secs(1), sends)
        .await
        .expect("sending to a slow client must not block");

    assert!(slow.is_closed());
    assert!(!hub.engine.hub.is_user_online(slow_user).await);
    assert_eq!(hub.engine.metrics.snapshot().clients_evicted, 1);

    let offline = watcher_session.wait_for("presence").await;
    assert_eq!(offline["status"], "offline");

    // The watcher's own connection is unaffected.
    assert!(watcher_session.drain().await.is_empty());
}

#[tokio::test]
async fn test_direct_send_on_full_queue_evicts() {
    let hub = TestHub::with_config(RealtimeConfig {
        client_queue_capacity: 2,
        ..RealtimeConfig::default()
    });
    let (client, _queue) = hub.engine.connect(UserId::new()).await;

    assert!(client.send_message(Bytes::from_static(b"1")));
    assert!(client.send_message(Bytes::from_static(b"2")));
    assert!(!client.send_message(Bytes::from_static(b"3")));

    for _ in 0..50 {
        if hub.engine.hub.client_count().await == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(hub.engine.hub.client_count().await, 0);
}

#[tokio::test]
async fn test_unregister_after_session_end_is_noop() {
    let hub = TestHub::new();
    let user = UserId::new();
    let session = hub.connect(user).await;
    let client_id = hub.engine.hub.user_clients(user).await[0].id;

    session.close().await;
    assert!(!hub.engine.hub.unregister(client_id).await);
    assert!(!hub.engine.hub.unregister(client_id).await);

    let snapshot = hub.engine.metrics.snapshot();
    assert_eq!(snapshot.connections_total, 1);
    assert_eq!(snapshot.connections_active, 0);
}

#[tokio::test]
async fn test_malformed_frames_keep_session_open() {
    let hub = TestHub::new();
    let mut session = hub.connect(UserId::new()).await;

    session.send_raw(b"not json");
    assert_eq!(session.expect("error").await["code"], "INVALID_MESSAGE");

    session.send(json!({"type": "moonwalk"}));
    assert_eq!(session.expect("error").await["code"], "UNKNOWN_MESSAGE_TYPE");

    session.send(json!({"type": "ping"}));
    session.expect("pong").await;
}

#[tokio::test]
async fn test_pong_reply_is_accepted_silently() {
    let hub = TestHub::new();
    let mut session = hub.connect(UserId::new()).await;

    session.send(json!({"type": "pong"}));
    assert!(session.drain().await.is_empty());
}

#[tokio::test]
async fn test_announcement_reaches_every_client() {
    use socialhub_core::events::{DomainEvent, SocialEvent};

    let hub = TestHub::new();
    let mut a = hub.connect(UserId::new()).await;
    let mut b = hub.connect(UserId::new()).await;

    let reached = hub
        .engine
        .bridge
        .handle(DomainEvent::new(
            UserId::new(),
            SocialEvent::SystemAnnouncement {
                title: "Maintenance".to_string(),
                message: "Back soon".to_string(),
            },
        ))
        .await;
    assert_eq!(reached, 2);

    for session in [&mut a, &mut b] {
        let frame = session.wait_for("announcement").await;
        assert_eq!(frame["title"], "Maintenance");
    }
}
