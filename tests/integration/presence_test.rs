//! Presence transitions as seen by friends.

use serde_json::json;

use socialhub_core::types::UserId;

use crate::helpers::TestHub;

fn presence_of(frames: &[serde_json::Value], user: UserId) -> Vec<String> {
    frames
        .iter()
        .filter(|f| f["type"] == "presence" && f["user_id"] == user.to_string())
        .map(|f| f["status"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_three_devices_produce_one_online_and_one_offline() {
    let hub = TestHub::new();
    let (alice, bob) = (UserId::new(), UserId::new());
    hub.users.befriend(alice, bob);

    let mut bob_session = hub.connect(bob).await;
    // Bob came online first; nothing else to see yet.
    bob_session.drain().await;

    let d1 = hub.connect(alice).await;
    let d2 = hub.connect(alice).await;
    let d3 = hub.connect(alice).await;
    assert_eq!(hub.engine.hub.user_clients(alice).await.len(), 3);

    let online = bob_session.wait_for("presence").await;
    assert_eq!(online["status"], "online");

    d1.close().await;
    d2.close().await;
    assert!(hub.engine.hub.is_user_online(alice).await);
    d3.close().await;
    assert!(!hub.engine.hub.is_user_online(alice).await);

    let offline = bob_session.wait_for("presence").await;
    assert_eq!(offline["user_id"], alice.to_string());
    assert_eq!(offline["status"], "offline");

    // No further transitions were broadcast.
    assert!(presence_of(&bob_session.drain().await, alice).is_empty());
}

#[tokio::test]
async fn test_reconnect_after_offline_is_a_new_interval() {
    let hub = TestHub::new();
    let (alice, bob) = (UserId::new(), UserId::new());
    hub.users.befriend(alice, bob);
    let mut bob_session = hub.connect(bob).await;
    bob_session.drain().await;

    hub.connect(alice).await.close().await;
    hub.connect(alice).await.close().await;

    let mut statuses = Vec::new();
    while statuses.len() < 4 {
        let frame = bob_session.wait_for("presence").await;
        statuses.push(frame["status"].as_str().unwrap().to_string());
    }
    assert_eq!(statuses, ["online", "offline", "online", "offline"]);
}

#[tokio::test]
async fn test_online_marks_last_active() {
    let hub = TestHub::new();
    let alice = UserId::new();
    let session = hub.connect(alice).await;
    // Membership is processed off the hub loop; poll briefly.
    for _ in 0..50 {
        if hub.users.last_active(alice).is_some() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(hub.users.last_active(alice).is_some());
    session.close().await;
}

#[tokio::test]
async fn test_online_friends_and_status_queries() {
    let hub = TestHub::new();
    let (alice, bob, carol) = (UserId::new(), UserId::new(), UserId::new());
    hub.users.befriend(alice, bob);
    hub.users.befriend(alice, carol);

    let _bob_session = hub.connect(bob).await;
    let mut alice_session = hub.connect(alice).await;

    alice_session.send(json!({"type": "get_online_friends"}));
    let frame = alice_session.wait_for("online_friends").await;
    assert_eq!(frame["friends"], json!([bob.to_string()]));

    alice_session.send(json!({"type": "get_user_status", "user_id": carol}));
    let frame = alice_session.wait_for("user_status").await;
    assert_eq!(frame["status"], "offline");
}

#[tokio::test]
async fn test_away_update_reaches_friends() {
    let hub = TestHub::new();
    let (alice, bob) = (UserId::new(), UserId::new());
    hub.users.befriend(alice, bob);
    let alice_session = hub.connect(alice).await;
    let mut bob_session = hub.connect(bob).await;
    bob_session.drain().await;

    alice_session.send(json!({"type": "presence_update", "status": "away"}));
    let frame = bob_session.wait_for("presence").await;
    assert_eq!(frame["user_id"], alice.to_string());
    assert_eq!(frame["status"], "away");
    assert!(hub.engine.hub.is_user_online(alice).await);
}
