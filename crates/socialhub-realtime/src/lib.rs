//! # socialhub-realtime
//!
//! Real-time connection hub for SocialHub. Provides:
//!
//! - A serialized hub loop owning the client registry (user → devices)
//! - Per-connection clients with bounded outbound queues and eviction of
//!   unresponsive clients
//! - Presence dispatch driven by 0→1 / 1→0 device-count transitions
//! - Notification delivery with read-state tracking
//! - Chat, typing, room and live-stream dispatchers
//! - A domain-event bridge for services outside the hub

pub mod bridge;
pub mod connection;
pub mod deadline;
pub mod features;
pub mod hub;
pub mod message;
pub mod metrics;
pub mod notification;
pub mod presence;
pub mod router;
pub mod server;

pub use bridge::EventBridge;
pub use connection::{Client, EnqueueOutcome};
pub use hub::{HubHandle, MembershipEvent};
pub use message::{InboundMessage, OutboundMessage};
pub use metrics::RealtimeMetrics;
pub use notification::NotificationDispatcher;
pub use presence::PresenceDispatcher;
pub use router::MessageRouter;
pub use server::RealtimeEngine;
