//! Shared domain types.
//!
//! Identifiers live in `socialhub-entity` so that entity models can use them;
//! they are re-exported here for callers that only depend on the core crate.

pub use socialhub_entity::id::{ClientId, NotificationId, RoomId, StreamId, UserId};
