//! Feature dispatchers built on the hub: direct chat, typing indicators,
//! chat rooms and live streams.

pub mod chat;
pub mod live_stream;
pub mod room;
pub mod typing;

pub use chat::ChatDispatcher;
pub use live_stream::LiveStreamDispatcher;
pub use room::RoomDispatcher;
pub use typing::TypingDispatcher;

use tracing::error;

use bytes::Bytes;

use crate::message::{OutboundMessage, encode_outbound};

/// Serialize a fan-out payload, logging failures.
pub(crate) fn encode_or_log(message: OutboundMessage) -> Option<Bytes> {
    match encode_outbound(message) {
        Ok(payload) => Some(payload),
        Err(e) => {
            error!(error = %e, "Failed to serialize outbound message");
            None
        }
    }
}
