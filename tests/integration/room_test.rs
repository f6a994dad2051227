//! Rooms, live-stream audiences and typing over the wire.

use serde_json::json;

use socialhub_core::types::{RoomId, StreamId, UserId};

use crate::helpers::TestHub;

#[tokio::test]
async fn test_room_conversation() {
    let hub = TestHub::new();
    let room = RoomId::new();
    let mut alice = hub.connect(UserId::new()).await;
    let mut bob = hub.connect(UserId::new()).await;

    alice.send(json!({"type": "join_room", "room_id": room}));
    alice.wait_for("room_member_joined").await;
    bob.send(json!({"type": "join_room", "room_id": room}));
    assert_eq!(
        alice.wait_for("room_member_joined").await["user_id"],
        bob.user_id.to_string()
    );

    bob.send(json!({"type": "room_message", "room_id": room, "text": "hey"}));
    let frame = alice.wait_for("room_message").await;
    assert_eq!(frame["sender_id"], bob.user_id.to_string());
    assert_eq!(frame["text"], "hey");

    bob.send(json!({"type": "leave_room", "room_id": room}));
    bob.wait_for("room_member_left").await;
    bob.send(json!({"type": "room_message", "room_id": room, "text": "still here?"}));
    assert_eq!(bob.wait_for("error").await["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_stream_audience() {
    let hub = TestHub::new();
    let stream = StreamId::new();
    let mut host = hub.connect(UserId::new()).await;
    let viewer = hub.connect(UserId::new()).await;

    host.send(json!({"type": "join_stream", "stream_id": stream}));
    assert_eq!(host.wait_for("stream_viewer_count").await["viewers"], 1);
    viewer.send(json!({"type": "join_stream", "stream_id": stream}));
    assert_eq!(host.wait_for("stream_viewer_count").await["viewers"], 2);

    viewer.send(json!({"type": "stream_comment", "stream_id": stream, "text": "first!"}));
    assert_eq!(host.wait_for("stream_comment").await["text"], "first!");

    viewer.send(json!({"type": "stream_reaction", "stream_id": stream, "reaction": "clap"}));
    assert_eq!(host.wait_for("stream_reaction").await["reaction"], "clap");

    viewer.send(json!({"type": "leave_stream", "stream_id": stream}));
    assert_eq!(host.wait_for("stream_viewer_count").await["viewers"], 1);
}

#[tokio::test]
async fn test_disconnected_viewer_drops_out_of_audience() {
    let hub = TestHub::new();
    let stream = StreamId::new();
    let mut watcher = hub.connect(UserId::new()).await;
    let leaver = hub.connect(UserId::new()).await;

    watcher.send(json!({"type": "join_stream", "stream_id": stream}));
    assert_eq!(watcher.wait_for("stream_viewer_count").await["viewers"], 1);
    leaver.send(json!({"type": "join_stream", "stream_id": stream}));
    assert_eq!(watcher.wait_for("stream_viewer_count").await["viewers"], 2);

    leaver.close().await;
    assert_eq!(watcher.wait_for("stream_viewer_count").await["viewers"], 1);

    let mut late = hub.connect(UserId::new()).await;
    late.send(json!({"type": "join_stream", "stream_id": stream}));
    assert_eq!(late.wait_for("stream_viewer_count").await["viewers"], 2);
}

#[tokio::test]
async fn test_typing_indicator() {
    let hub = TestHub::new();
    let alice = hub.connect(UserId::new()).await;
    let mut bob = hub.connect(UserId::new()).await;

    alice.send(json!({"type": "typing", "recipient_id": bob.user_id, "is_typing": true}));
    let frame = bob.wait_for("typing").await;
    assert_eq!(frame["user_id"], alice.user_id.to_string());
    assert_eq!(frame["is_typing"], true);
}
