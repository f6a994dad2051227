//! # socialhub-store
//!
//! In-memory implementations of the collaborator traits declared in
//! `socialhub-core::traits`. The server binary uses them when no external
//! document store is configured, and the test suites use them as fixtures.

pub mod memory;

pub use memory::notification::MemoryNotificationStore;
pub use memory::room::MemoryRoomDirectory;
pub use memory::user::MemoryUserDirectory;
