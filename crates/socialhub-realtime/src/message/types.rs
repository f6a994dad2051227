//! Inbound and outbound WebSocket message type definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use socialhub_core::types::{NotificationId, RoomId, StreamId, UserId};
use socialhub_entity::{Notification, PresenceStatus};

/// Messages sent by the client to the server.
///
/// Any `type` tag not listed here decodes to [`InboundMessage::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Application-level keepalive; answered with `pong`.
    Ping,
    /// Answer to a server `ping`. Only refreshes activity.
    Pong,
    /// Client-initiated presence change (e.g. "away").
    PresenceUpdate {
        /// New status.
        status: String,
    },
    /// List the requesting user's friends that are online.
    GetOnlineFriends,
    /// Online status of one user.
    GetUserStatus {
        /// Target user.
        user_id: UserId,
    },
    /// Mark one notification, or all of them, as read.
    NotificationRead {
        /// Notification to mark.
        #[serde(default)]
        notification_id: Option<NotificationId>,
        /// Mark every notification instead.
        #[serde(default)]
        all: bool,
    },
    /// Unread notification count.
    GetUnreadCount,
    /// Most recent notifications.
    GetNotifications {
        /// Maximum number to return.
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Direct message to another user.
    ChatMessage {
        /// Recipient.
        recipient_id: UserId,
        /// Message text.
        text: String,
    },
    /// Typing indicator towards another user.
    Typing {
        /// Recipient.
        recipient_id: UserId,
        /// Whether the user is currently typing.
        is_typing: bool,
    },
    /// Join a chat room.
    JoinRoom {
        /// Room to join.
        room_id: RoomId,
    },
    /// Leave a chat room.
    LeaveRoom {
        /// Room to leave.
        room_id: RoomId,
    },
    /// Post to a chat room.
    RoomMessage {
        /// Target room.
        room_id: RoomId,
        /// Message text.
        text: String,
    },
    /// Start watching a live stream.
    JoinStream {
        /// Stream to watch.
        stream_id: StreamId,
    },
    /// Stop watching a live stream.
    LeaveStream {
        /// Stream to leave.
        stream_id: StreamId,
    },
    /// Comment on a live stream.
    StreamComment {
        /// Target stream.
        stream_id: StreamId,
        /// Comment text.
        text: String,
    },
    /// React to a live stream.
    StreamReaction {
        /// Target stream.
        stream_id: StreamId,
        /// Reaction identifier (emoji or short name).
        reaction: String,
    },
    /// Any unrecognized type tag.
    #[serde(other)]
    Unknown,
}

/// Messages sent by the server to the client.
///
/// Serialized inside an [`super::envelope::OutboundEnvelope`], which adds the
/// `timestamp` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Reply to a client `ping`.
    Pong,
    /// Server keepalive.
    Ping,
    /// Presence change of a friend.
    Presence {
        /// The user whose presence changed.
        user_id: UserId,
        /// New status.
        status: PresenceStatus,
    },
    /// Friends currently online.
    OnlineFriends {
        /// Online friend IDs.
        friends: Vec<UserId>,
    },
    /// Status of a single user.
    UserStatus {
        /// The queried user.
        user_id: UserId,
        /// Current status.
        status: PresenceStatus,
    },
    /// Live notification delivery.
    Notification {
        /// The notification.
        notification: Notification,
    },
    /// Recent notifications list.
    Notifications {
        /// Newest first.
        notifications: Vec<Notification>,
    },
    /// Unread notification count.
    UnreadCount {
        /// Number of unread notifications.
        count: u64,
    },
    /// Direct message.
    ChatMessage {
        /// Server-assigned message ID.
        message_id: Uuid,
        /// Sender.
        sender_id: UserId,
        /// Recipient.
        recipient_id: UserId,
        /// Message text.
        text: String,
    },
    /// Typing indicator.
    Typing {
        /// The user who is typing.
        user_id: UserId,
        /// Whether they are typing.
        is_typing: bool,
    },
    /// Room message.
    RoomMessage {
        /// Room.
        room_id: RoomId,
        /// Sender.
        sender_id: UserId,
        /// Message text.
        text: String,
    },
    /// Someone joined a room.
    RoomMemberJoined {
        /// Room.
        room_id: RoomId,
        /// New member.
        user_id: UserId,
    },
    /// Someone left a room.
    RoomMemberLeft {
        /// Room.
        room_id: RoomId,
        /// Departed member.
        user_id: UserId,
    },
    /// Live-stream comment.
    StreamComment {
        /// Stream.
        stream_id: StreamId,
        /// Commenter.
        user_id: UserId,
        /// Comment text.
        text: String,
    },
    /// Live-stream reaction.
    StreamReaction {
        /// Stream.
        stream_id: StreamId,
        /// Reacting user.
        user_id: UserId,
        /// Reaction identifier.
        reaction: String,
    },
    /// Current audience size of a stream.
    StreamViewerCount {
        /// Stream.
        stream_id: StreamId,
        /// Number of viewers.
        viewers: usize,
    },
    /// Platform-wide announcement.
    Announcement {
        /// Title.
        title: String,
        /// Body.
        message: String,
    },
    /// Error message.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}

impl OutboundMessage {
    /// Build an error frame.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}
