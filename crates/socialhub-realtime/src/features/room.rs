//! Chat rooms.

use std::sync::Arc;

use tracing::{debug, warn};

use socialhub_core::traits::RoomDirectory;
use socialhub_core::types::{RoomId, UserId};

use super::encode_or_log;
use crate::connection::Client;
use crate::hub::HubHandle;
use crate::message::OutboundMessage;
use crate::message::validator::validate_text;

/// Directory key of a chat room.
pub fn room_key(room_id: RoomId) -> String {
    format!("room:{room_id}")
}

/// Room membership and message fan-out. Membership lives in the external
/// [`RoomDirectory`].
#[derive(Debug, Clone)]
pub struct RoomDispatcher {
    hub: HubHandle,
    rooms: Arc<dyn RoomDirectory>,
    max_length: usize,
}

impl RoomDispatcher {
    /// Create a new dispatcher.
    pub fn new(hub: HubHandle, rooms: Arc<dyn RoomDirectory>, max_length: usize) -> Self {
        Self {
            hub,
            rooms,
            max_length,
        }
    }

    /// Add the client's user to a room and tell the members.
    ///
    /// Joining a room one is already in only acknowledges to the client.
    pub async fn join_room(&self, client: &Client, room_id: RoomId) {
        let key = room_key(room_id);
        let joined = match client
            .bounded("room join", self.rooms.join(&key, client.user_id))
            .await
        {
            Ok(joined) => joined,
            Err(e) => {
                warn!(room_id = %room_id, error = %e, "Room join failed");
                client.send_app_error(&e);
                return;
            }
        };

        let event = OutboundMessage::RoomMemberJoined {
            room_id,
            user_id: client.user_id,
        };
        if !joined {
            client.send_json(event);
            return;
        }

        debug!(room_id = %room_id, user_id = %client.user_id, "Joined room");
        self.fan_out(client, &key, event).await;
    }

    /// Remove the client's user from a room and tell the remaining members.
    pub async fn leave_room(&self, client: &Client, room_id: RoomId) {
        let key = room_key(room_id);
        let left = match client
            .bounded("room leave", self.rooms.leave(&key, client.user_id))
            .await
        {
            Ok(left) => left,
            Err(e) => {
                warn!(room_id = %room_id, error = %e, "Room leave failed");
                client.send_app_error(&e);
                return;
            }
        };

        let event = OutboundMessage::RoomMemberLeft {
            room_id,
            user_id: client.user_id,
        };
        if left {
            debug!(room_id = %room_id, user_id = %client.user_id, "Left room");
            self.fan_out_with(client, &key, event, Some(client.user_id))
                .await;
        } else {
            client.send_json(event);
        }
    }

    /// Post to a room. Only members may post.
    pub async fn send_room_message(&self, client: &Client, room_id: RoomId, text: &str) {
        let text = match validate_text(text, self.max_length) {
            Ok(text) => text,
            Err(reason) => {
                client.send_error_message("VALIDATION_ERROR", reason);
                return;
            }
        };

        let key = room_key(room_id);
        match client
            .bounded("room membership", self.rooms.is_member(&key, client.user_id))
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                client.send_error_message("FORBIDDEN", format!("Not a member of room {room_id}"));
                return;
            }
            Err(e) => {
                client.send_app_error(&e);
                return;
            }
        }

        let message = OutboundMessage::RoomMessage {
            room_id,
            sender_id: client.user_id,
            text: text.to_string(),
        };
        self.fan_out(client, &key, message).await;
    }

    async fn fan_out(&self, client: &Client, key: &str, message: OutboundMessage) {
        self.fan_out_with(client, key, message, None).await
    }

    /// Send `message` to every member of `key`, plus `extra` if given.
    async fn fan_out_with(
        &self,
        client: &Client,
        key: &str,
        message: OutboundMessage,
        extra: Option<UserId>,
    ) {
        let mut members = match client.bounded("room members", self.rooms.members(key)).await {
            Ok(members) => members,
            Err(e) => {
                client.send_app_error(&e);
                return;
            }
        };
        if let Some(user_id) = extra {
            if !members.contains(&user_id) {
                members.push(user_id);
            }
        }
        if let Some(payload) = encode_or_log(message) {
            self.hub.broadcast_to_users(members, payload).await;
        }
    }
}
