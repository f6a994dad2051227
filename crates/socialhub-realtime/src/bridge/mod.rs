//! Bridge from domain events to realtime notifications.

pub mod event_bridge;

pub use event_bridge::EventBridge;
