//! Presence dispatcher.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use socialhub_core::result::AppResult;
use socialhub_core::traits::UserDirectory;
use socialhub_core::types::UserId;
use socialhub_entity::PresenceStatus;

use crate::connection::Client;
use crate::deadline;
use crate::hub::HubHandle;
use crate::message::{OutboundMessage, encode_outbound};
use crate::metrics::RealtimeMetrics;

/// Broadcasts presence changes to friends and answers presence queries.
#[derive(Debug, Clone)]
pub struct PresenceDispatcher {
    hub: HubHandle,
    users: Arc<dyn UserDirectory>,
    metrics: Arc<RealtimeMetrics>,
    call_timeout: Duration,
}

impl PresenceDispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        hub: HubHandle,
        users: Arc<dyn UserDirectory>,
        metrics: Arc<RealtimeMetrics>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            hub,
            users,
            metrics,
            call_timeout,
        }
    }

    /// A user's first device connected.
    ///
    /// Records last-active (best-effort) and tells the user's friends.
    pub async fn notify_user_online(&self, user_id: UserId) {
        let touched = deadline::bounded(
            self.call_timeout,
            "last-active update",
            self.users.touch_last_active(user_id, Utc::now()),
        )
        .await;
        if let Err(e) = touched {
            warn!(user_id = %user_id, error = %e, "Failed to update last active");
            self.metrics.best_effort_failed();
        }

        self.broadcast_to_friends(user_id, PresenceStatus::Online)
            .await;
    }

    /// A user's last device disconnected.
    pub async fn notify_user_offline(&self, user_id: UserId) {
        self.broadcast_to_friends(user_id, PresenceStatus::Offline)
            .await;
    }

    /// Client-initiated status change, e.g. `away`. The registry is not
    /// affected.
    pub async fn process_presence_update(&self, client: &Client, status: &str) {
        let status = match status.parse::<PresenceStatus>() {
            Ok(status) => status,
            Err(e) => {
                client.send_error_message("INVALID_STATUS", e.to_string());
                return;
            }
        };

        debug!(user_id = %client.user_id, status = %status, "Presence update");
        self.broadcast_to_friends(client.user_id, status).await;
    }

    /// Sends the requesting client its online friends.
    pub async fn send_online_friends(&self, client: &Client) {
        match client
            .bounded("friends lookup", self.users.friends(client.user_id))
            .await
        {
            Ok(friends) => {
                let online = self.hub.filter_online(friends).await;
                client.send_json(OutboundMessage::OnlineFriends { friends: online });
            }
            Err(e) => {
                warn!(user_id = %client.user_id, error = %e, "Failed to load friends");
                client.send_app_error(&e);
            }
        }
    }

    /// Sends the requesting client the status of `target`.
    ///
    /// Only the user's own status or a friend's may be queried.
    pub async fn get_user_status_for_client(&self, client: &Client, target: UserId) {
        if target != client.user_id {
            match client
                .bounded("friends lookup", self.users.friends(client.user_id))
                .await
            {
                Ok(friends) if friends.contains(&target) => {}
                Ok(_) => {
                    client.send_error_message("FORBIDDEN", "User status is only visible to friends");
                    return;
                }
                Err(e) => {
                    client.send_app_error(&e);
                    return;
                }
            }
        }

        let status = if self.hub.is_user_online(target).await {
            PresenceStatus::Online
        } else {
            PresenceStatus::Offline
        };
        client.send_json(OutboundMessage::UserStatus {
            user_id: target,
            status,
        });
    }

    async fn broadcast_to_friends(&self, user_id: UserId, status: PresenceStatus) {
        let friends = match self.friends(user_id).await {
            Ok(friends) => friends,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Presence broadcast skipped");
                self.metrics.best_effort_failed();
                return;
            }
        };
        if friends.is_empty() {
            return;
        }

        let payload = match encode_outbound(OutboundMessage::Presence { user_id, status }) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to serialize presence");
                return;
            }
        };
        let delivered = self.hub.broadcast_to_users(friends, payload).await;
        debug!(user_id = %user_id, status = %status, delivered, "Presence broadcast");
    }

    async fn friends(&self, user_id: UserId) -> AppResult<Vec<UserId>> {
        deadline::bounded(self.call_timeout, "friends lookup", self.users.friends(user_id)).await
    }
}
