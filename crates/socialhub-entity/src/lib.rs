//! # socialhub-entity
//!
//! Domain models shared by the realtime hub and the stores behind it:
//! typed identifiers, notifications, and presence status.

pub mod id;
pub mod notification;
pub mod presence;

pub use id::{ClientId, NotificationId, RoomId, StreamId, UserId};
pub use notification::{Notification, NotificationType};
pub use presence::PresenceStatus;
