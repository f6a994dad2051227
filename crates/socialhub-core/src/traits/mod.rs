//! Collaborator traits consumed by the realtime hub and implemented by the
//! persistence layer.
//!
//! Every method is async and fallible; the hub decides per call site whether
//! a failure is swallowed (best-effort) or surfaced to the requesting client.

pub mod notification_store;
pub mod room_directory;
pub mod user_directory;

pub use notification_store::{NotificationStore, ReadTarget};
pub use room_directory::RoomDirectory;
pub use user_directory::UserDirectory;
