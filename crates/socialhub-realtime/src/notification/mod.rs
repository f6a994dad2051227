//! Notification delivery and read-state handling.

pub mod dispatcher;
pub mod formatter;

pub use dispatcher::NotificationDispatcher;
pub use formatter::{NotificationDraft, NotificationFormatter};
