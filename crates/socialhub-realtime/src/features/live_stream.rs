//! Live-stream audiences: viewer counts, comments, reactions and
//! go-live announcements.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use socialhub_core::traits::{RoomDirectory, UserDirectory};
use socialhub_core::types::{StreamId, UserId};
use socialhub_entity::Notification;

use super::encode_or_log;
use crate::connection::Client;
use crate::deadline;
use crate::hub::HubHandle;
use crate::message::OutboundMessage;
use crate::message::validator::validate_text;
use crate::notification::{NotificationDispatcher, NotificationFormatter};

/// Longest accepted reaction identifier, in characters.
const MAX_REACTION_CHARS: usize = 32;

/// Directory key of a stream audience.
pub fn stream_key(stream_id: StreamId) -> String {
    format!("stream:{stream_id}")
}

/// Stream audience handling. Viewers are kept in the [`RoomDirectory`]
/// under the stream key; a user leaves every audience when their last
/// device disconnects.
#[derive(Debug, Clone)]
pub struct LiveStreamDispatcher {
    hub: HubHandle,
    viewers: Arc<dyn RoomDirectory>,
    /// User → streams they are watching
    watching: Arc<DashMap<UserId, HashSet<StreamId>>>,
    users: Arc<dyn UserDirectory>,
    notifications: NotificationDispatcher,
    max_length: usize,
    call_timeout: Duration,
}

impl LiveStreamDispatcher {
    /// Create a new dispatcher.
    pub fn new(
        hub: HubHandle,
        viewers: Arc<dyn RoomDirectory>,
        users: Arc<dyn UserDirectory>,
        notifications: NotificationDispatcher,
        max_length: usize,
        call_timeout: Duration,
    ) -> Self {
        Self {
            hub,
            viewers,
            watching: Arc::new(DashMap::new()),
            users,
            notifications,
            max_length,
            call_timeout,
        }
    }

    /// Start watching. Every viewer receives the new audience size.
    pub async fn join_stream(&self, client: &Client, stream_id: StreamId) {
        let key = stream_key(stream_id);
        if let Err(e) = client
            .bounded("stream join", self.viewers.join(&key, client.user_id))
            .await
        {
            client.send_app_error(&e);
            return;
        }
        self.watching
            .entry(client.user_id)
            .or_default()
            .insert(stream_id);
        self.publish_viewer_count(client, stream_id, None).await;
    }

    /// Stop watching. Remaining viewers and the leaver receive the new
    /// audience size.
    pub async fn leave_stream(&self, client: &Client, stream_id: StreamId) {
        let key = stream_key(stream_id);
        if let Err(e) = client
            .bounded("stream leave", self.viewers.leave(&key, client.user_id))
            .await
        {
            client.send_app_error(&e);
            return;
        }
        self.watching
            .remove_if_mut(&client.user_id, |_, streams| {
                streams.remove(&stream_id);
                streams.is_empty()
            });
        self.publish_viewer_count(client, stream_id, Some(client.user_id))
            .await;
    }

    /// Removes a user whose last device disconnected from every audience
    /// they joined. Remaining viewers receive the new audience size.
    pub async fn remove_viewer(&self, user_id: UserId) {
        let Some((_, streams)) = self.watching.remove(&user_id) else {
            return;
        };

        for stream_id in streams {
            let key = stream_key(stream_id);
            let left = deadline::bounded(self.call_timeout, "stream leave", self.viewers.leave(&key, user_id)).await;
            if let Err(e) = left {
                warn!(user_id = %user_id, stream_id = %stream_id, error = %e, "Failed to drop disconnected viewer");
                continue;
            }
            match deadline::bounded(self.call_timeout, "stream viewers", self.viewers.members(&key)).await {
                Ok(viewers) => self.send_viewer_count(stream_id, viewers.len(), viewers).await,
                Err(e) => {
                    warn!(stream_id = %stream_id, error = %e, "Viewer count not published");
                }
            }
        }
        debug!(user_id = %user_id, "Disconnected viewer removed from streams");
    }

    /// Comment on a stream. Only viewers may comment.
    pub async fn send_stream_comment(&self, client: &Client, stream_id: StreamId, text: &str) {
        let text = match validate_text(text, self.max_length) {
            Ok(text) => text.to_string(),
            Err(reason) => {
                client.send_error_message("VALIDATION_ERROR", reason);
                return;
            }
        };
        let message = OutboundMessage::StreamComment {
            stream_id,
            user_id: client.user_id,
            text,
        };
        self.fan_out_from_viewer(client, stream_id, message).await;
    }

    /// React to a stream. Only viewers may react.
    pub async fn send_stream_reaction(&self, client: &Client, stream_id: StreamId, reaction: &str) {
        let reaction = match validate_text(reaction, MAX_REACTION_CHARS) {
            Ok(reaction) => reaction.to_string(),
            Err(reason) => {
                client.send_error_message("VALIDATION_ERROR", reason);
                return;
            }
        };
        let message = OutboundMessage::StreamReaction {
            stream_id,
            user_id: client.user_id,
            reaction,
        };
        self.fan_out_from_viewer(client, stream_id, message).await;
    }

    /// Notify the host's friends that the stream went live.
    ///
    /// Returns the notifications created. A failed friends lookup is logged
    /// and yields none.
    pub async fn announce_stream_started(
        &self,
        host_id: UserId,
        stream_id: StreamId,
        title: &str,
        host_name: &str,
    ) -> Vec<Notification> {
        let friends = match deadline::bounded(
            self.call_timeout,
            "friends lookup",
            self.users.friends(host_id),
        )
        .await
        {
            Ok(friends) => friends,
            Err(e) => {
                warn!(user_id = %host_id, stream_id = %stream_id, error = %e, "Stream announcement skipped");
                return Vec::new();
            }
        };

        let draft = NotificationFormatter::live_stream_started(host_name, stream_id, title);
        let created = self
            .notifications
            .broadcast_draft(&friends, host_id, &draft)
            .await;
        info!(
            user_id = %host_id,
            stream_id = %stream_id,
            notified = created.len(),
            "Stream start announced"
        );
        created
    }

    async fn fan_out_from_viewer(&self, client: &Client, stream_id: StreamId, message: OutboundMessage) {
        let key = stream_key(stream_id);
        let viewers = match client.bounded("stream viewers", self.viewers.members(&key)).await {
            Ok(viewers) => viewers,
            Err(e) => {
                client.send_app_error(&e);
                return;
            }
        };
        if !viewers.contains(&client.user_id) {
            client.send_error_message("FORBIDDEN", format!("Not watching stream {stream_id}"));
            return;
        }
        if let Some(payload) = encode_or_log(message) {
            self.hub.broadcast_to_users(viewers, payload).await;
        }
    }

    async fn publish_viewer_count(&self, client: &Client, stream_id: StreamId, extra: Option<UserId>) {
        let key = stream_key(stream_id);
        let viewers = match client.bounded("stream viewers", self.viewers.members(&key)).await {
            Ok(viewers) => viewers,
            Err(e) => {
                client.send_app_error(&e);
                return;
            }
        };
        let count = viewers.len();
        debug!(stream_id = %stream_id, viewers = count, "Viewer count changed");

        let mut targets = viewers;
        if let Some(user_id) = extra {
            if !targets.contains(&user_id) {
                targets.push(user_id);
            }
        }
        self.send_viewer_count(stream_id, count, targets).await;
    }

    async fn send_viewer_count(&self, stream_id: StreamId, count: usize, targets: Vec<UserId>) {
        if let Some(payload) = encode_or_log(OutboundMessage::StreamViewerCount {
            stream_id,
            viewers: count,
        }) {
            self.hub.broadcast_to_users(targets, payload).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use tokio::sync::mpsc;

    use socialhub_core::config::RealtimeConfig;
    use socialhub_core::traits::NotificationStore;
    use socialhub_store::{MemoryNotificationStore, MemoryRoomDirectory, MemoryUserDirectory};

    use super::*;
    use crate::metrics::RealtimeMetrics;

    async fn next_frame(queue: &mut mpsc::Receiver<Bytes>) -> serde_json::Value {
        serde_json::from_slice(&queue.recv().await.unwrap()).unwrap()
    }

    struct Fixture {
        streams: LiveStreamDispatcher,
        hub: HubHandle,
        users: Arc<MemoryUserDirectory>,
        store: Arc<MemoryNotificationStore>,
    }

    fn setup() -> Fixture {
        let metrics = Arc::new(RealtimeMetrics::new());
        let (hub, _events) = HubHandle::spawn(&RealtimeConfig::default(), metrics.clone());
        let users = Arc::new(MemoryUserDirectory::new());
        let store = Arc::new(MemoryNotificationStore::new());
        let notifications = NotificationDispatcher::new(
            hub.clone(),
            store.clone(),
            metrics,
            Duration::from_secs(1),
            50,
        );
        let streams = LiveStreamDispatcher::new(
            hub.clone(),
            Arc::new(MemoryRoomDirectory::new()),
            users.clone(),
            notifications,
            100,
            Duration::from_secs(1),
        );
        Fixture {
            streams,
            hub,
            users,
            store,
        }
    }

    #[tokio::test]
    async fn test_viewer_count_follows_joins_and_leaves() {
        let f = setup();
        let stream = StreamId::new();
        let (a_client, mut a_queue) = f.hub.connect(UserId::new()).await;
        let (b_client, mut b_queue) = f.hub.connect(UserId::new()).await;

        f.streams.join_stream(&a_client, stream).await;
        assert_eq!(next_frame(&mut a_queue).await["viewers"], 1);

        f.streams.join_stream(&b_client, stream).await;
        assert_eq!(next_frame(&mut a_queue).await["viewers"], 2);
        assert_eq!(next_frame(&mut b_queue).await["viewers"], 2);

        f.streams.leave_stream(&b_client, stream).await;
        assert_eq!(next_frame(&mut a_queue).await["viewers"], 1);
        let frame = next_frame(&mut b_queue).await;
        assert_eq!(frame["type"], "stream_viewer_count");
        assert_eq!(frame["viewers"], 1);
    }

    #[tokio::test]
    async fn test_disconnected_viewer_leaves_audience() {
        let f = setup();
        let stream = StreamId::new();
        let gone = UserId::new();
        let (gone_client, _gone_queue) = f.hub.connect(gone).await;
        let (stay_client, mut stay_queue) = f.hub.connect(UserId::new()).await;

        f.streams.join_stream(&gone_client, stream).await;
        f.streams.join_stream(&stay_client, stream).await;
        assert_eq!(next_frame(&mut stay_queue).await["viewers"], 2);

        f.streams.remove_viewer(gone).await;
        assert_eq!(next_frame(&mut stay_queue).await["viewers"], 1);

        let (late_client, mut late_queue) = f.hub.connect(UserId::new()).await;
        f.streams.join_stream(&late_client, stream).await;
        assert_eq!(next_frame(&mut late_queue).await["viewers"], 2);

        // Nothing left to remove.
        f.streams.remove_viewer(gone).await;
        assert!(stay_queue.try_recv().is_ok());
        assert!(stay_queue.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reactions_require_viewer_and_short_name() {
        let f = setup();
        let stream = StreamId::new();
        let (client, mut queue) = f.hub.connect(UserId::new()).await;

        f.streams.send_stream_reaction(&client, stream, "heart").await;
        assert_eq!(next_frame(&mut queue).await["code"], "FORBIDDEN");

        f.streams.join_stream(&client, stream).await;
        next_frame(&mut queue).await;

        f.streams.send_stream_reaction(&client, stream, &"x".repeat(40)).await;
        assert_eq!(next_frame(&mut queue).await["code"], "VALIDATION_ERROR");

        f.streams.send_stream_reaction(&client, stream, "heart").await;
        let frame = next_frame(&mut queue).await;
        assert_eq!(frame["type"], "stream_reaction");
        assert_eq!(frame["reaction"], "heart");
    }

    #[tokio::test]
    async fn test_announcement_notifies_friends() {
        let f = setup();
        let (host, friend, stranger) = (UserId::new(), UserId::new(), UserId::new());
        f.users.befriend(host, friend);
        let (_friend_client, mut friend_queue) = f.hub.connect(friend).await;

        let created = f
            .streams
            .announce_stream_started(host, StreamId::new(), "Cooking", "Ann")
            .await;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].user_id, friend);

        let frame = next_frame(&mut friend_queue).await;
        assert_eq!(frame["notification"]["notification_type"], "live_stream");
        assert_eq!(frame["notification"]["message"], "Ann is live: Cooking");
        assert_eq!(f.store.unread_count(stranger).await.unwrap(), 0);
    }
}
