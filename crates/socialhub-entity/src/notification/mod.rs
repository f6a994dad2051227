//! Notification domain entities.

pub mod model;
pub mod notification_type;

pub use model::Notification;
pub use notification_type::NotificationType;
