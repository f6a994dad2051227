//! # socialhub-api
//!
//! HTTP surface of the realtime hub: the `/ws` upgrade endpoint, which
//! authenticates a JWT and hands the socket to the
//! [`socialhub_realtime::RealtimeEngine`], plus health endpoints.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
