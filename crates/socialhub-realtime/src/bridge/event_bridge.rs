//! Domain event → notification mapping.
//!
//! Services outside the hub (follows, comments, likes, streaming) publish
//! [`DomainEvent`]s; the bridge persists and pushes the resulting
//! notifications.

use tracing::{debug, error, info};

use socialhub_core::events::{DomainEvent, SocialEvent};
use socialhub_core::types::UserId;

use crate::features::LiveStreamDispatcher;
use crate::hub::HubHandle;
use crate::message::{OutboundMessage, encode_outbound};
use crate::notification::{NotificationDispatcher, NotificationDraft, NotificationFormatter};

/// Bridges domain events into the realtime system.
#[derive(Debug, Clone)]
pub struct EventBridge {
    hub: HubHandle,
    notifications: NotificationDispatcher,
    streams: LiveStreamDispatcher,
}

impl EventBridge {
    /// Create a new event bridge
    pub fn new(
        hub: HubHandle,
        notifications: NotificationDispatcher,
        streams: LiveStreamDispatcher,
    ) -> Self {
        Self {
            hub,
            notifications,
            streams,
        }
    }

    /// Handle one domain event.
    ///
    /// Returns how many users were reached: notifications created, or for
    /// announcements the number of clients the push was enqueued on. Users
    /// are never notified about their own actions.
    pub async fn handle(&self, event: DomainEvent) -> usize {
        let actor_id = event.actor_id;
        debug!(event_id = %event.id, actor_id = %actor_id, "Bridging domain event");

        match event.payload {
            SocialEvent::UserFollowed {
                followee_id,
                actor_name,
            } => {
                let draft = NotificationFormatter::user_followed(&actor_name, actor_id);
                self.notify(&recipients(actor_id, [followee_id]), actor_id, &draft)
                    .await
            }
            SocialEvent::PostCommented {
                author_id,
                post_id,
                actor_name,
                excerpt,
            } => {
                let draft = NotificationFormatter::post_commented(&actor_name, &post_id, &excerpt);
                self.notify(&recipients(actor_id, [author_id]), actor_id, &draft)
                    .await
            }
            SocialEvent::PostLiked {
                author_id,
                post_id,
                actor_name,
            } => {
                let draft = NotificationFormatter::post_liked(&actor_name, &post_id);
                self.notify(&recipients(actor_id, [author_id]), actor_id, &draft)
                    .await
            }
            SocialEvent::UsersMentioned {
                user_ids,
                post_id,
                actor_name,
            } => {
                let draft = NotificationFormatter::mentioned(&actor_name, &post_id);
                self.notify(&recipients(actor_id, user_ids), actor_id, &draft)
                    .await
            }
            SocialEvent::LiveStreamStarted {
                stream_id,
                title,
                actor_name,
            } => self
                .streams
                .announce_stream_started(actor_id, stream_id, &title, &actor_name)
                .await
                .len(),
            SocialEvent::SystemAnnouncement { title, message } => {
                match encode_outbound(OutboundMessage::Announcement { title, message }) {
                    Ok(payload) => {
                        let delivered = self.hub.broadcast_all(payload).await;
                        info!(delivered, "System announcement pushed");
                        delivered
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to serialize announcement");
                        0
                    }
                }
            }
        }
    }

    async fn notify(
        &self,
        user_ids: &[UserId],
        actor_id: UserId,
        draft: &NotificationDraft,
    ) -> usize {
        if user_ids.is_empty() {
            return 0;
        }
        self.notifications
            .broadcast_draft(user_ids, actor_id, draft)
            .await
            .len()
    }
}

/// Distinct recipients in first-seen order, excluding the actor.
fn recipients(actor_id: UserId, candidates: impl IntoIterator<Item = UserId>) -> Vec<UserId> {
    let mut out: Vec<UserId> = Vec::new();
    for user_id in candidates {
        if user_id != actor_id && !out.contains(&user_id) {
            out.push(user_id);
        }
    }
    out
}
