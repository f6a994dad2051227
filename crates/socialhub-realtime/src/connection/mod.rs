//! Per-connection client state and the tasks that serve it.

pub mod client;
pub mod heartbeat;
pub mod session;

pub use client::{Client, EnqueueOutcome};
pub use heartbeat::{HeartbeatConfig, run_heartbeat};
pub use session::{read_pump, run_session, write_pump};
