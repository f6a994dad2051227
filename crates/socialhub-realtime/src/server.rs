//! Top-level real-time engine that ties together all subsystems.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use futures::{Sink, Stream};
use tokio::sync::mpsc;
use tracing::info;

use socialhub_core::config::RealtimeConfig;
use socialhub_core::traits::{NotificationStore, RoomDirectory, UserDirectory};
use socialhub_core::types::UserId;

use crate::bridge::EventBridge;
use crate::connection::{Client, HeartbeatConfig, run_session};
use crate::features::{ChatDispatcher, LiveStreamDispatcher, RoomDispatcher, TypingDispatcher};
use crate::hub::HubHandle;
use crate::metrics::RealtimeMetrics;
use crate::notification::NotificationDispatcher;
use crate::presence::{PresenceDispatcher, run_membership};
use crate::router::MessageRouter;

/// Central real-time engine that coordinates all WebSocket subsystems.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Hub handle.
    pub hub: HubHandle,
    /// Presence dispatcher.
    pub presence: Arc<PresenceDispatcher>,
    /// Notification dispatcher.
    pub notifications: NotificationDispatcher,
    /// Direct chat.
    pub chat: ChatDispatcher,
    /// Typing indicators.
    pub typing: TypingDispatcher,
    /// Chat rooms.
    pub rooms: RoomDispatcher,
    /// Live streams.
    pub streams: LiveStreamDispatcher,
    /// Inbound router.
    pub router: Arc<MessageRouter>,
    /// Event bridge (domain events → notifications).
    pub bridge: EventBridge,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    config: RealtimeConfig,
}

impl fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("hub", &self.hub)
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates the engine and spawns the hub loop and membership task.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(
        config: RealtimeConfig,
        users: Arc<dyn UserDirectory>,
        store: Arc<dyn NotificationStore>,
        rooms: Arc<dyn RoomDirectory>,
    ) -> Self {
        let metrics = Arc::new(RealtimeMetrics::new());
        let call_timeout = config.external_call_timeout();
        let (hub, membership) = HubHandle::spawn(&config, metrics.clone());

        let presence = Arc::new(PresenceDispatcher::new(
            hub.clone(),
            users.clone(),
            metrics.clone(),
            call_timeout,
        ));

        let notifications = NotificationDispatcher::new(
            hub.clone(),
            store,
            metrics.clone(),
            call_timeout,
            config.recent_notifications_limit,
        );
        let chat = ChatDispatcher::new(hub.clone(), config.max_chat_length);
        let typing = TypingDispatcher::new(hub.clone());
        let room_dispatcher = RoomDispatcher::new(hub.clone(), rooms.clone(), config.max_chat_length);
        let streams = LiveStreamDispatcher::new(
            hub.clone(),
            rooms,
            users,
            notifications.clone(),
            config.max_chat_length,
            call_timeout,
        );
        tokio::spawn(run_membership(presence.clone(), streams.clone(), membership));

        let router = Arc::new(MessageRouter::new(
            presence.clone(),
            notifications.clone(),
            chat.clone(),
            typing.clone(),
            room_dispatcher.clone(),
            streams.clone(),
            metrics.clone(),
            config.max_message_size_bytes,
        ));
        let bridge = EventBridge::new(hub.clone(), notifications.clone(), streams.clone());

        info!(
            queue_capacity = config.client_queue_capacity,
            ping_interval_seconds = config.ping_interval_seconds,
            "Real-time engine initialized"
        );

        Self {
            hub,
            presence,
            notifications,
            chat,
            typing,
            rooms: room_dispatcher,
            streams,
            router,
            bridge,
            metrics,
            config,
        }
    }

    /// Registers a new client for `user_id` without serving it.
    pub async fn connect(&self, user_id: UserId) -> (Arc<Client>, mpsc::Receiver<Bytes>) {
        self.hub.connect(user_id).await
    }

    /// Registers a client for an authenticated user and serves it over the
    /// given transport until either side closes.
    pub async fn serve_connection<S, E, K>(&self, user_id: UserId, inbound: S, sink: K)
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: fmt::Display,
        K: Sink<Bytes> + Unpin + Send + 'static,
        K::Error: fmt::Display + Send,
    {
        let (client, queue) = self.hub.connect(user_id).await;
        run_session(
            client,
            queue,
            inbound,
            sink,
            &self.router,
            HeartbeatConfig::from_config(&self.config),
        )
        .await;
    }

    /// Realtime configuration in effect.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Closes every client and stops the hub.
    pub async fn shutdown(&self) {
        info!("Shutting down real-time engine");
        self.hub.shutdown().await;
    }
}
