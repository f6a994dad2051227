//! WebSocket message types, framing, serialization, and validation.

pub mod envelope;
pub mod serializer;
pub mod types;
pub mod validator;

pub use envelope::OutboundEnvelope;
pub use serializer::{FrameError, decode_inbound, encode_outbound};
pub use types::{InboundMessage, OutboundMessage};
