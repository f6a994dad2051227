//! Notification persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use socialhub_entity::Notification;

use crate::result::AppResult;
use crate::types::{NotificationId, UserId};

/// Which notifications a read request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scope", content = "id")]
pub enum ReadTarget {
    /// A single notification.
    One(NotificationId),
    /// Every notification of the user.
    All,
}

/// Authoritative storage for notifications.
#[async_trait]
pub trait NotificationStore: std::fmt::Debug + Send + Sync + 'static {
    /// Persist a new notification.
    async fn create(&self, notification: &Notification) -> AppResult<()>;

    /// Replace the stored copy of an existing notification.
    async fn update(&self, notification: &Notification) -> AppResult<()>;

    /// Record live delivery of a notification, leaving its read state as
    /// stored. Returns the stored copy after the change.
    async fn mark_sent(&self, id: NotificationId, at: DateTime<Utc>) -> AppResult<Notification>;

    /// Look up a notification by ID.
    async fn find(&self, id: NotificationId) -> AppResult<Option<Notification>>;

    /// Mark one notification of `user_id` as read.
    ///
    /// Marking an already-read notification succeeds. A notification that
    /// does not exist or belongs to another user is `NotFound`.
    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<()>;

    /// Mark every unread notification of `user_id` as read, returning how
    /// many changed.
    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64>;

    /// Count unread notifications of `user_id`.
    async fn unread_count(&self, user_id: UserId) -> AppResult<u64>;

    /// Most recent notifications of `user_id`, newest first.
    async fn recent(&self, user_id: UserId, limit: usize) -> AppResult<Vec<Notification>>;
}
