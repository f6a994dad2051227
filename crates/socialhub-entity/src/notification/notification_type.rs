//! Notification type classification.

use serde::{Deserialize, Serialize};

/// What kind of action produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// Someone followed the user.
    Follow,
    /// Someone commented on the user's content.
    Comment,
    /// Someone liked the user's content.
    Like,
    /// Someone mentioned the user.
    Mention,
    /// A direct message arrived.
    Message,
    /// A followed user started a live stream.
    LiveStream,
    /// Platform announcement.
    System,
}

impl NotificationType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Comment => "comment",
            Self::Like => "like",
            Self::Mention => "mention",
            Self::Message => "message",
            Self::LiveStream => "live_stream",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
