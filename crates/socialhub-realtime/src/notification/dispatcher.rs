//! Notification dispatcher: live delivery, persistence and read state.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, warn};

use socialhub_core::traits::{NotificationStore, ReadTarget};
use socialhub_core::types::UserId;
use socialhub_entity::{Notification, NotificationType};

use super::formatter::NotificationDraft;
use crate::connection::Client;
use crate::deadline;
use crate::hub::HubHandle;
use crate::message::{OutboundMessage, encode_outbound};
use crate::metrics::RealtimeMetrics;

/// Delivers notifications to live connections and keeps the store in sync.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    hub: HubHandle,
    store: Arc<dyn NotificationStore>,
    metrics: Arc<RealtimeMetrics>,
    call_timeout: Duration,
    recent_limit: usize,
}

impl NotificationDispatcher {
    /// Create a new dispatcher. `recent_limit` caps `get_notifications`.
    pub fn new(
        hub: HubHandle,
        store: Arc<dyn NotificationStore>,
        metrics: Arc<RealtimeMetrics>,
        call_timeout: Duration,
        recent_limit: usize,
    ) -> Self {
        Self {
            hub,
            store,
            metrics,
            call_timeout,
            recent_limit: recent_limit.max(1),
        }
    }

    /// Push an already persisted notification to its recipient.
    ///
    /// Only an online recipient gets it; the notification is then marked
    /// sent and the store updated. An offline recipient leaves it unsent.
    /// Returns the number of devices it was enqueued on.
    pub async fn send_notification(&self, mut notification: Notification) -> usize {
        let user_id = notification.user_id;
        if !self.hub.is_user_online(user_id).await {
            debug!(
                notification_id = %notification.id,
                user_id = %user_id,
                "Recipient offline, notification kept for later"
            );
            return 0;
        }

        let sent_at = Utc::now();
        let marked = deadline::bounded(
            self.call_timeout,
            "notification update",
            self.store.mark_sent(notification.id, sent_at),
        )
        .await;
        let notification = match marked {
            Ok(stored) => stored,
            Err(e) => {
                warn!(notification_id = %notification.id, error = %e, "Failed to mark notification sent");
                self.metrics.best_effort_failed();
                notification.mark_sent(sent_at);
                notification
            }
        };

        let payload = match encode_outbound(OutboundMessage::Notification { notification }) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Failed to serialize notification");
                return 0;
            }
        };
        let delivered = self.hub.send_to_user(user_id, payload).await;
        if delivered > 0 {
            self.metrics.notification_dispatched();
        }
        delivered
    }

    /// Create one notification per user and deliver each.
    ///
    /// Users are handled independently: a persistence failure for one is
    /// logged and counted and the rest proceed. Returns the notifications
    /// that were persisted.
    pub async fn broadcast_notification(
        &self,
        user_ids: &[UserId],
        notification_type: NotificationType,
        actor_id: UserId,
        subject: &str,
        subject_id: &str,
        message: &str,
    ) -> Vec<Notification> {
        let notifications = user_ids
            .iter()
            .map(|user_id| {
                Notification::new(
                    *user_id,
                    actor_id,
                    notification_type,
                    subject,
                    subject_id,
                    message,
                )
            })
            .collect();
        self.create_and_send(notifications).await
    }

    /// [`Self::broadcast_notification`] from a formatted draft.
    pub async fn broadcast_draft(
        &self,
        user_ids: &[UserId],
        actor_id: UserId,
        draft: &NotificationDraft,
    ) -> Vec<Notification> {
        let notifications = user_ids
            .iter()
            .map(|user_id| {
                let notification = Notification::new(
                    *user_id,
                    actor_id,
                    draft.notification_type,
                    draft.subject.as_str(),
                    draft.subject_id.as_str(),
                    draft.message.as_str(),
                );
                match &draft.action_url {
                    Some(url) => notification.with_action_url(url.as_str()),
                    None => notification,
                }
            })
            .collect();
        self.create_and_send(notifications).await
    }

    /// Mark one notification or all of them read, then push the new unread
    /// count to the same client. Already-read notifications count as success.
    pub async fn process_notification_read(&self, client: &Client, target: ReadTarget) {
        let result = match target {
            ReadTarget::One(id) => client
                .bounded("mark notification read", self.store.mark_read(id, client.user_id))
                .await
                .map(|()| 1),
            ReadTarget::All => {
                client
                    .bounded("mark all notifications read", self.store.mark_all_read(client.user_id))
                    .await
            }
        };

        match result {
            Ok(changed) => {
                debug!(user_id = %client.user_id, changed, "Notifications marked read");
                self.send_unread_notifications_count(client).await;
            }
            Err(e) => {
                warn!(user_id = %client.user_id, error = %e, "Failed to mark notifications read");
                client.send_app_error(&e);
            }
        }
    }

    /// Send the unread count to the requesting client only.
    pub async fn send_unread_notifications_count(&self, client: &Client) {
        match client
            .bounded("unread count", self.store.unread_count(client.user_id))
            .await
        {
            Ok(count) => {
                client.send_json(OutboundMessage::UnreadCount { count });
            }
            Err(e) => {
                warn!(user_id = %client.user_id, error = %e, "Failed to count unread notifications");
                client.send_app_error(&e);
            }
        }
    }

    /// Send the most recent notifications, newest first.
    pub async fn send_recent_notifications(&self, client: &Client, limit: Option<usize>) {
        let limit = limit
            .unwrap_or(self.recent_limit)
            .clamp(1, self.recent_limit);
        match client
            .bounded("recent notifications", self.store.recent(client.user_id, limit))
            .await
        {
            Ok(notifications) => {
                client.send_json(OutboundMessage::Notifications { notifications });
            }
            Err(e) => {
                warn!(user_id = %client.user_id, error = %e, "Failed to load notifications");
                client.send_app_error(&e);
            }
        }
    }

    async fn create_and_send(&self, notifications: Vec<Notification>) -> Vec<Notification> {
        let mut created = Vec::with_capacity(notifications.len());
        for notification in notifications {
            let persisted = deadline::bounded(
                self.call_timeout,
                "notification create",
                self.store.create(&notification),
            )
            .await;
            if let Err(e) = persisted {
                warn!(
                    user_id = %notification.user_id,
                    error = %e,
                    "Failed to persist notification, skipping user"
                );
                self.metrics.best_effort_failed();
                continue;
            }
            self.metrics.notification_persisted();
            self.send_notification(notification.clone()).await;
            created.push(notification);
        }
        created
    }
}
