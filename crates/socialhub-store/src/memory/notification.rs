//! In-memory notification store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_core::traits::NotificationStore;
use socialhub_core::types::{NotificationId, UserId};
use socialhub_entity::Notification;

/// Notifications keyed by ID.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    by_id: DashMap<NotificationId, Notification>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored notifications.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(&self, notification: &Notification) -> AppResult<()> {
        if self.by_id.contains_key(&notification.id) {
            return Err(AppError::validation(format!(
                "Notification {} already exists",
                notification.id
            )));
        }
        self.by_id.insert(notification.id, notification.clone());
        Ok(())
    }

    async fn update(&self, notification: &Notification) -> AppResult<()> {
        match self.by_id.get_mut(&notification.id) {
            Some(mut stored) => {
                *stored = notification.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!(
                "Notification {} not found",
                notification.id
            ))),
        }
    }

    async fn mark_sent(&self, id: NotificationId, at: DateTime<Utc>) -> AppResult<Notification> {
        let mut stored = self
            .by_id
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
        stored.mark_sent(at);
        Ok(stored.clone())
    }

    async fn find(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        Ok(self.by_id.get(&id).map(|r| r.value().clone()))
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<()> {
        let mut stored = self
            .by_id
            .get_mut(&id)
            .filter(|n| n.user_id == user_id)
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;

        if !stored.mark_read(Utc::now()) {
            debug!(notification_id = %id, "Notification already read");
        }
        Ok(())
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let now = Utc::now();
        let mut changed = 0u64;
        for mut entry in self.by_id.iter_mut() {
            if entry.user_id == user_id && entry.mark_read(now) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn unread_count(&self, user_id: UserId) -> AppResult<u64> {
        Ok(self
            .by_id
            .iter()
            .filter(|n| n.user_id == user_id && n.is_unread())
            .count() as u64)
    }

    async fn recent(&self, user_id: UserId, limit: usize) -> AppResult<Vec<Notification>> {
        let mut list: Vec<Notification> = self
            .by_id
            .iter()
            .filter(|n| n.user_id == user_id)
            .map(|n| n.value().clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list.truncate(limit);
        Ok(list)
    }
}
