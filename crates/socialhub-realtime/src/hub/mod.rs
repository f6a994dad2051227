//! The hub: a single task that owns the client registry.
//!
//! All mutation of the registry is linearized through [`HubHandle`], which
//! sends [`command::HubCommand`]s to the loop in [`event_loop`]. The loop
//! detects a user's 0→1 and 1→0 device transitions and reports them as
//! [`MembershipEvent`]s on a separate channel, so presence fan-out (which
//! calls external services) never runs on the loop itself.

pub mod command;
pub mod event_loop;
pub mod handle;
pub mod registry;

use serde::Serialize;

use socialhub_core::types::UserId;

pub use handle::HubHandle;
pub use registry::Registry;

/// A user's first device connected or last device disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipEvent {
    /// 0 → 1 devices.
    Online(UserId),
    /// 1 → 0 devices.
    Offline(UserId),
}

/// Registry size at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HubStats {
    /// Registered clients.
    pub clients: usize,
    /// Users with at least one client.
    pub users: usize,
}
