//! JSON framing for WebSocket messages.

use bytes::Bytes;
use thiserror::Error;

use socialhub_core::result::AppResult;

use super::envelope::OutboundEnvelope;
use super::types::{InboundMessage, OutboundMessage};

/// Reasons an inbound frame cannot be turned into an [`InboundMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Frame exceeds the configured size limit.
    #[error("Message of {size} bytes exceeds maximum of {max} bytes")]
    TooLarge {
        /// Received size.
        size: usize,
        /// Configured limit.
        max: usize,
    },
    /// Frame is empty or whitespace only.
    #[error("Empty message")]
    Empty,
    /// Not JSON, no `type` tag, or fields do not match the tag.
    #[error("Failed to parse message: {0}")]
    Malformed(String),
    /// Well-formed envelope with a tag no dispatcher handles.
    #[error("Unknown message type '{0}'")]
    UnknownType(String),
}

impl FrameError {
    /// Error code sent back to the client.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooLarge { .. } => "MESSAGE_TOO_LARGE",
            Self::Empty => "EMPTY_MESSAGE",
            Self::Malformed(_) => "INVALID_MESSAGE",
            Self::UnknownType(_) => "UNKNOWN_MESSAGE_TYPE",
        }
    }
}

/// Serialize an outbound message, stamped with the current time.
pub fn encode_outbound(msg: OutboundMessage) -> AppResult<Bytes> {
    let json = serde_json::to_vec(&OutboundEnvelope::new(msg))?;
    Ok(Bytes::from(json))
}

/// Deserialize an inbound frame.
pub fn decode_inbound(raw: &[u8]) -> Result<InboundMessage, FrameError> {
    let value: serde_json::Value =
        serde_json::from_slice(raw).map_err(|e| FrameError::Malformed(e.to_string()))?;

    let tag = value
        .get("type")
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| FrameError::Malformed("missing string field 'type'".to_string()))?;

    match serde_json::from_value(value) {
        Ok(InboundMessage::Unknown) => Err(FrameError::UnknownType(tag)),
        Ok(msg) => Ok(msg),
        Err(e) => Err(FrameError::Malformed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use socialhub_core::types::UserId;

    use super::*;

    #[test]
    fn test_decode_chat_message() {
        let recipient = UserId::new();
        let raw = format!(
            r#"{{"type":"chat_message","recipient_id":"{recipient}","text":"hey"}}"#
        );
        let msg = decode_inbound(raw.as_bytes()).expect("decode");
        assert_eq!(
            msg,
            InboundMessage::ChatMessage {
                recipient_id: recipient,
                text: "hey".to_string()
            }
        );
    }

    #[test]
    fn test_decode_unit_variant() {
        assert_eq!(
            decode_inbound(br#"{"type":"get_unread_count"}"#),
            Ok(InboundMessage::GetUnreadCount)
        );
    }

    #[test]
    fn test_unknown_tag_is_reported_with_name() {
        let err = decode_inbound(br#"{"type":"teleport","to":"mars"}"#).unwrap_err();
        assert_eq!(err, FrameError::UnknownType("teleport".to_string()));
        assert_eq!(err.code(), "UNKNOWN_MESSAGE_TYPE");
    }

    #[test]
    fn test_known_tag_with_bad_fields_is_malformed() {
        let err = decode_inbound(br#"{"type":"typing","recipient_id":"nope"}"#).unwrap_err();
        assert!(matches!(err, FrameError::Malformed(_)));
    }

    #[test]
    fn test_missing_tag_is_malformed() {
        let err = decode_inbound(br#"{"text":"hi"}"#).unwrap_err();
        assert!(matches!(err, FrameError::Malformed(_)));
        assert!(matches!(
            decode_inbound(b"not json"),
            Err(FrameError::Malformed(_))
        ));
    }

    #[test]
    fn test_encode_adds_type_and_timestamp() {
        let bytes = encode_outbound(OutboundMessage::UnreadCount { count: 3 }).expect("encode");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(value["type"], "unread_count");
        assert_eq!(value["count"], 3);
        assert!(value["timestamp"].is_string());
    }
}
