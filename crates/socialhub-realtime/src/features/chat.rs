//! Direct messages between users.

use tracing::debug;
use uuid::Uuid;

use socialhub_core::types::UserId;

use super::encode_or_log;
use crate::connection::Client;
use crate::hub::HubHandle;
use crate::message::OutboundMessage;
use crate::message::validator::validate_text;

/// Delivers chat messages to the recipient and echoes them to the sender's
/// other devices.
#[derive(Debug, Clone)]
pub struct ChatDispatcher {
    hub: HubHandle,
    max_length: usize,
}

impl ChatDispatcher {
    /// Create a new dispatcher accepting texts of up to `max_length`
    /// characters.
    pub fn new(hub: HubHandle, max_length: usize) -> Self {
        Self { hub, max_length }
    }

    /// Send `text` from the client's user to `recipient_id`.
    pub async fn send_chat_message(&self, client: &Client, recipient_id: UserId, text: &str) {
        let text = match validate_text(text, self.max_length) {
            Ok(text) => text,
            Err(reason) => {
                client.send_error_message("VALIDATION_ERROR", reason);
                return;
            }
        };

        let sender_id = client.user_id;
        let Some(payload) = encode_or_log(OutboundMessage::ChatMessage {
            message_id: Uuid::new_v4(),
            sender_id,
            recipient_id,
            text: text.to_string(),
        }) else {
            return;
        };

        let targets = if recipient_id == sender_id {
            vec![sender_id]
        } else {
            vec![recipient_id, sender_id]
        };
        let delivered = self.hub.broadcast_to_users(targets, payload).await;
        debug!(
            sender_id = %sender_id,
            recipient_id = %recipient_id,
            delivered,
            "Chat message delivered"
        );
    }
}
