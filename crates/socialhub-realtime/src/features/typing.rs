//! Typing indicators.

use socialhub_core::types::UserId;

use super::encode_or_log;
use crate::connection::Client;
use crate::hub::HubHandle;
use crate::message::OutboundMessage;

/// Forwards typing indicators to the recipient only.
#[derive(Debug, Clone)]
pub struct TypingDispatcher {
    hub: HubHandle,
}

impl TypingDispatcher {
    /// Create a new dispatcher.
    pub fn new(hub: HubHandle) -> Self {
        Self { hub }
    }

    /// Tell `recipient_id` whether the client's user is typing.
    /// Indicators addressed to oneself are dropped.
    pub async fn process_typing(&self, client: &Client, recipient_id: UserId, is_typing: bool) {
        if recipient_id == client.user_id {
            return;
        }
        if let Some(payload) = encode_or_log(OutboundMessage::Typing {
            user_id: client.user_id,
            is_typing,
        }) {
            self.hub.send_to_user(recipient_id, payload).await;
        }
    }
}
