//! Human-readable notification text for social events.

use socialhub_core::types::{StreamId, UserId};
use socialhub_entity::NotificationType;

/// Longest comment excerpt quoted in a notification, in characters.
const EXCERPT_CHARS: usize = 80;

/// Everything needed to build a notification except its recipient and actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    /// Notification type.
    pub notification_type: NotificationType,
    /// Kind of object the notification is about.
    pub subject: String,
    /// Identifier of that object.
    pub subject_id: String,
    /// Display text.
    pub message: String,
    /// Deep link.
    pub action_url: Option<String>,
}

impl NotificationDraft {
    fn new(
        notification_type: NotificationType,
        subject: &str,
        subject_id: impl Into<String>,
        message: String,
    ) -> Self {
        Self {
            notification_type,
            subject: subject.to_string(),
            subject_id: subject_id.into(),
            message,
            action_url: None,
        }
    }

    fn action_url(mut self, url: String) -> Self {
        self.action_url = Some(url);
        self
    }
}

/// Formats notifications for common events.
pub struct NotificationFormatter;

impl NotificationFormatter {
    /// `actor` started following the recipient.
    pub fn user_followed(actor_name: &str, actor_id: UserId) -> NotificationDraft {
        NotificationDraft::new(
            NotificationType::Follow,
            "user",
            actor_id.to_string(),
            format!("{actor_name} started following you"),
        )
        .action_url(format!("/users/{actor_id}"))
    }

    /// `actor` commented on the recipient's post.
    pub fn post_commented(actor_name: &str, post_id: &str, excerpt: &str) -> NotificationDraft {
        let message = match Self::excerpt(excerpt) {
            Some(quote) => format!("{actor_name} commented on your post: \"{quote}\""),
            None => format!("{actor_name} commented on your post"),
        };
        NotificationDraft::new(NotificationType::Comment, "post", post_id, message)
            .action_url(format!("/posts/{post_id}"))
    }

    /// `actor` liked the recipient's post.
    pub fn post_liked(actor_name: &str, post_id: &str) -> NotificationDraft {
        NotificationDraft::new(
            NotificationType::Like,
            "post",
            post_id,
            format!("{actor_name} liked your post"),
        )
        .action_url(format!("/posts/{post_id}"))
    }

    /// `actor` mentioned the recipient.
    pub fn mentioned(actor_name: &str, post_id: &str) -> NotificationDraft {
        NotificationDraft::new(
            NotificationType::Mention,
            "post",
            post_id,
            format!("{actor_name} mentioned you in a post"),
        )
        .action_url(format!("/posts/{post_id}"))
    }

    /// `actor` went live.
    pub fn live_stream_started(actor_name: &str, stream_id: StreamId, title: &str) -> NotificationDraft {
        let message = if title.trim().is_empty() {
            format!("{actor_name} is live now")
        } else {
            format!("{actor_name} is live: {}", title.trim())
        };
        NotificationDraft::new(NotificationType::LiveStream, "stream", stream_id.to_string(), message)
            .action_url(format!("/live/{stream_id}"))
    }

    fn excerpt(text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if text.chars().count() <= EXCERPT_CHARS {
            return Some(text.to_string());
        }
        let cut: String = text.chars().take(EXCERPT_CHARS).collect();
        Some(format!("{}…", cut.trim_end()))
    }
}
