//! Notification delivery and read state over the wire.

use serde_json::json;

use socialhub_core::events::{DomainEvent, SocialEvent};
use socialhub_core::traits::NotificationStore;
use socialhub_core::types::{NotificationId, StreamId, UserId};

use crate::helpers::TestHub;

fn liked(actor: UserId, author: UserId) -> DomainEvent {
    DomainEvent::new(
        actor,
        SocialEvent::PostLiked {
            author_id: author,
            post_id: "post-1".to_string(),
            actor_name: "Ann".to_string(),
        },
    )
}

#[tokio::test]
async fn test_notification_round_trip() {
    let hub = TestHub::new();
    let (ann, bob) = (UserId::new(), UserId::new());
    let mut bob_session = hub.connect(bob).await;

    assert_eq!(hub.engine.bridge.handle(liked(ann, bob)).await, 1);

    let frame = bob_session.wait_for("notification").await;
    let notification = &frame["notification"];
    assert_eq!(notification["message"], "Ann liked your post");
    assert_eq!(notification["notification_type"], "like");
    assert_eq!(notification["sent"], true);
    assert_eq!(notification["read"], false);

    bob_session.send(json!({"type": "get_unread_count"}));
    assert_eq!(bob_session.wait_for("unread_count").await["count"], 1);

    bob_session.send(json!({
        "type": "notification_read",
        "notification_id": notification["id"],
    }));
    assert_eq!(bob_session.wait_for("unread_count").await["count"], 0);

    // Reading again is not an error.
    bob_session.send(json!({
        "type": "notification_read",
        "notification_id": notification["id"],
    }));
    assert_eq!(bob_session.wait_for("unread_count").await["count"], 0);

    let id: NotificationId = notification["id"].as_str().unwrap().parse().unwrap();
    let stored = hub.store.find(id).await.unwrap().unwrap();
    assert!(stored.sent && stored.read);
    assert!(stored.read_at.is_some());
}

#[tokio::test]
async fn test_offline_recipient_sees_notification_later() {
    let hub = TestHub::new();
    let (ann, bob) = (UserId::new(), UserId::new());

    assert_eq!(hub.engine.bridge.handle(liked(ann, bob)).await, 1);

    let mut bob_session = hub.connect(bob).await;
    bob_session.send(json!({"type": "get_notifications", "limit": 10}));
    let frame = bob_session.wait_for("notifications").await;
    let list = frame["notifications"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["sent"], false);
}

#[tokio::test]
async fn test_unread_count_across_offline_periods() {
    let hub = TestHub::new();
    let (ann, bob) = (UserId::new(), UserId::new());

    assert_eq!(hub.engine.bridge.handle(liked(ann, bob)).await, 1);
    let stored = hub.store.recent(bob, 10).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(!stored[0].read && !stored[0].sent);

    let mut first = hub.connect(bob).await;
    first.send(json!({"type": "get_unread_count"}));
    assert_eq!(first.wait_for("unread_count").await["count"], 1);
    first.close().await;

    // Read through another surface while bob is offline.
    hub.store.mark_read(stored[0].id, bob).await.unwrap();

    let mut second = hub.connect(bob).await;
    second.send(json!({"type": "get_unread_count"}));
    assert_eq!(second.wait_for("unread_count").await["count"], 0);
}

#[tokio::test]
async fn test_mark_all_read_only_touches_requesting_user() {
    let hub = TestHub::new();
    let (ann, bob, carol) = (UserId::new(), UserId::new(), UserId::new());
    for _ in 0..3 {
        hub.engine.bridge.handle(liked(ann, bob)).await;
    }
    hub.engine.bridge.handle(liked(ann, carol)).await;

    let mut bob_session = hub.connect(bob).await;
    bob_session.send(json!({"type": "notification_read", "all": true}));
    assert_eq!(bob_session.wait_for("unread_count").await["count"], 0);

    assert_eq!(hub.store.unread_count(bob).await.unwrap(), 0);
    assert_eq!(hub.store.unread_count(carol).await.unwrap(), 1);
}

#[tokio::test]
async fn test_cannot_read_someone_elses_notification() {
    let hub = TestHub::new();
    let (ann, bob, mallory) = (UserId::new(), UserId::new(), UserId::new());
    hub.engine.bridge.handle(liked(ann, bob)).await;
    let bobs = hub.store.recent(bob, 1).await.unwrap();

    let mut mallory_session = hub.connect(mallory).await;
    mallory_session.send(json!({"type": "notification_read", "notification_id": bobs[0].id}));
    assert_eq!(mallory_session.wait_for("error").await["code"], "NOT_FOUND");
    assert_eq!(hub.store.unread_count(bob).await.unwrap(), 1);
}

#[tokio::test]
async fn test_self_actions_do_not_notify() {
    let hub = TestHub::new();
    let ann = UserId::new();
    assert_eq!(hub.engine.bridge.handle(liked(ann, ann)).await, 0);
    assert!(hub.store.is_empty());
}

#[tokio::test]
async fn test_live_stream_start_notifies_online_friends() {
    let hub = TestHub::new();
    let (host, friend) = (UserId::new(), UserId::new());
    hub.users.befriend(host, friend);
    let mut friend_session = hub.connect(friend).await;

    let reached = hub
        .engine
        .bridge
        .handle(DomainEvent::new(
            host,
            SocialEvent::LiveStreamStarted {
                stream_id: StreamId::new(),
                title: "Q&A".to_string(),
                actor_name: "Host".to_string(),
            },
        ))
        .await;
    assert_eq!(reached, 1);

    let frame = friend_session.wait_for("notification").await;
    assert_eq!(frame["notification"]["notification_type"], "live_stream");
    assert_eq!(frame["notification"]["message"], "Host is live: Q&A");
}
