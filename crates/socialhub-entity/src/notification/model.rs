//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{NotificationId, UserId};

use super::NotificationType;

/// A notification addressed to one user.
///
/// `sent` and `read` are independent flags: a notification can be read
/// through another surface before it was ever delivered live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// The user whose action produced the notification.
    pub actor_id: UserId,
    /// Notification type.
    pub notification_type: NotificationType,
    /// Kind of object the notification is about (e.g. `"post"`, `"profile"`).
    pub subject: String,
    /// Identifier of that object.
    pub subject_id: String,
    /// Human-readable text.
    pub message: String,
    /// Optional image shown next to the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Optional deep link opened on tap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    /// Whether the user has read this notification.
    pub read: bool,
    /// Whether the notification was pushed to a live connection.
    pub sent: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// When the notification was pushed live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    /// When the notification was read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Build a fresh, unread and unsent notification.
    pub fn new(
        user_id: UserId,
        actor_id: UserId,
        notification_type: NotificationType,
        subject: impl Into<String>,
        subject_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            actor_id,
            notification_type,
            subject: subject.into(),
            subject_id: subject_id.into(),
            message: message.into(),
            image_url: None,
            action_url: None,
            read: false,
            sent: false,
            created_at: Utc::now(),
            sent_at: None,
            read_at: None,
        }
    }

    /// Attach an image URL.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Attach an action URL.
    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    /// Check if the notification has been read.
    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// Record live delivery.
    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.sent = true;
        self.sent_at = Some(at);
    }

    /// Record a read. Returns `false` if it was already read.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.read {
            return false;
        }
        self.read = true;
        self.read_at = Some(at);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification::new(
            UserId::new(),
            UserId::new(),
            NotificationType::Follow,
            "profile",
            "abc",
            "someone followed you",
        )
    }

    #[test]
    fn test_new_is_unread_and_unsent() {
        let n = sample();
        assert!(n.is_unread());
        assert!(!n.sent);
        assert!(n.sent_at.is_none());
    }

    #[test]
    fn test_mark_read_twice_is_not_an_error() {
        let mut n = sample();
        assert!(n.mark_read(Utc::now()));
        let first = n.read_at;
        assert!(!n.mark_read(Utc::now()));
        assert_eq!(n.read_at, first);
    }

    #[test]
    fn test_sent_and_read_are_independent() {
        let mut n = sample();
        n.mark_read(Utc::now());
        assert!(!n.sent);
        n.mark_sent(Utc::now());
        assert!(n.sent && n.read);
    }

    #[test]
    fn test_optional_urls_omitted_from_json() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert!(json.get("image_url").is_none());
        assert_eq!(json["notification_type"], "follow");
    }
}
