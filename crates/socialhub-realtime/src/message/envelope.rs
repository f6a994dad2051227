//! Envelope adding server metadata to outbound messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::OutboundMessage;

/// Outbound frame: the tagged message fields plus a server timestamp.
///
/// Serializes flat, e.g. `{"type":"unread_count","count":3,"timestamp":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEnvelope {
    /// The message payload
    #[serde(flatten)]
    pub data: OutboundMessage,
    /// When the frame was produced
    pub timestamp: DateTime<Utc>,
}

impl OutboundEnvelope {
    /// Wrap a message, stamping it with the current time
    pub fn new(data: OutboundMessage) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
        }
    }
}
