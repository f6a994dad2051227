//! Presence fan-out to friends.

pub mod dispatcher;
pub mod membership;

pub use dispatcher::PresenceDispatcher;
pub use membership::run_membership;
