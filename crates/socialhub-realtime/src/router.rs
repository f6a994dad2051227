//! Inbound message routing.

use std::sync::Arc;

use tracing::debug;

use socialhub_core::traits::ReadTarget;

use crate::connection::Client;
use crate::features::{ChatDispatcher, LiveStreamDispatcher, RoomDispatcher, TypingDispatcher};
use crate::message::validator::validate_frame;
use crate::message::{InboundMessage, OutboundMessage, decode_inbound};
use crate::metrics::RealtimeMetrics;
use crate::notification::NotificationDispatcher;
use crate::presence::PresenceDispatcher;

/// Dispatches decoded inbound frames to the feature dispatchers.
///
/// Malformed or unknown frames are answered with an `error` frame; the
/// connection stays open.
#[derive(Debug, Clone)]
pub struct MessageRouter {
    presence: Arc<PresenceDispatcher>,
    notifications: NotificationDispatcher,
    chat: ChatDispatcher,
    typing: TypingDispatcher,
    rooms: RoomDispatcher,
    streams: LiveStreamDispatcher,
    metrics: Arc<RealtimeMetrics>,
    max_message_size: usize,
}

impl MessageRouter {
    /// Create a new router.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        presence: Arc<PresenceDispatcher>,
        notifications: NotificationDispatcher,
        chat: ChatDispatcher,
        typing: TypingDispatcher,
        rooms: RoomDispatcher,
        streams: LiveStreamDispatcher,
        metrics: Arc<RealtimeMetrics>,
        max_message_size: usize,
    ) -> Self {
        Self {
            presence,
            notifications,
            chat,
            typing,
            rooms,
            streams,
            metrics,
            max_message_size,
        }
    }

    /// Handle one raw inbound frame from `client`.
    pub async fn route(&self, client: &Client, raw: &[u8]) {
        self.metrics.message_received();

        let message = match validate_frame(raw, self.max_message_size).and_then(|()| decode_inbound(raw)) {
            Ok(message) => message,
            Err(e) => {
                debug!(client_id = %client.id, error = %e, "Rejected inbound frame");
                client.send_error_message(e.code(), e.to_string());
                return;
            }
        };

        match message {
            InboundMessage::Ping => {
                client.send_json(OutboundMessage::Pong);
            }
            // Activity was recorded when the frame was read.
            InboundMessage::Pong => {}
            InboundMessage::PresenceUpdate { status } => {
                self.presence.process_presence_update(client, &status).await;
            }
            InboundMessage::GetOnlineFriends => {
                self.presence.send_online_friends(client).await;
            }
            InboundMessage::GetUserStatus { user_id } => {
                self.presence
                    .get_user_status_for_client(client, user_id)
                    .await;
            }
            InboundMessage::NotificationRead {
                notification_id,
                all,
            } => {
                let target = match (notification_id, all) {
                    (_, true) => ReadTarget::All,
                    (Some(id), false) => ReadTarget::One(id),
                    (None, false) => {
                        client.send_error_message(
                            "VALIDATION_ERROR",
                            "notification_read needs notification_id or all",
                        );
                        return;
                    }
                };
                self.notifications
                    .process_notification_read(client, target)
                    .await;
            }
            InboundMessage::GetUnreadCount => {
                self.notifications
                    .send_unread_notifications_count(client)
                    .await;
            }
            InboundMessage::GetNotifications { limit } => {
                self.notifications
                    .send_recent_notifications(client, limit)
                    .await;
            }
            InboundMessage::ChatMessage { recipient_id, text } => {
                self.chat
                    .send_chat_message(client, recipient_id, &text)
                    .await;
            }
            InboundMessage::Typing {
                recipient_id,
                is_typing,
            } => {
                self.typing
                    .process_typing(client, recipient_id, is_typing)
                    .await;
            }
            InboundMessage::JoinRoom { room_id } => self.rooms.join_room(client, room_id).await,
            InboundMessage::LeaveRoom { room_id } => self.rooms.leave_room(client, room_id).await,
            InboundMessage::RoomMessage { room_id, text } => {
                self.rooms.send_room_message(client, room_id, &text).await;
            }
            InboundMessage::JoinStream { stream_id } => {
                self.streams.join_stream(client, stream_id).await;
            }
            InboundMessage::LeaveStream { stream_id } => {
                self.streams.leave_stream(client, stream_id).await;
            }
            InboundMessage::StreamComment { stream_id, text } => {
                self.streams
                    .send_stream_comment(client, stream_id, &text)
                    .await;
            }
            InboundMessage::StreamReaction {
                stream_id,
                reaction,
            } => {
                self.streams
                    .send_stream_reaction(client, stream_id, &reaction)
                    .await;
            }
            InboundMessage::Unknown => {
                client.send_error_message("UNKNOWN_MESSAGE_TYPE", "Unknown message type");
            }
        }
    }
}
