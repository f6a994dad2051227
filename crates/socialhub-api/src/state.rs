//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Instant;

use socialhub_core::config::AppConfig;
use socialhub_realtime::RealtimeEngine;

use crate::auth::WsAuthenticator;

/// Application state passed to every handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Real-time engine
    pub realtime: RealtimeEngine,
    /// Token validation for WebSocket upgrades
    pub authenticator: Arc<WsAuthenticator>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Builds the state around an already running engine.
    pub fn new(config: Arc<AppConfig>, realtime: RealtimeEngine) -> Self {
        let authenticator = Arc::new(WsAuthenticator::new(&config.auth));
        Self {
            config,
            realtime,
            authenticator,
            started_at: Instant::now(),
        }
    }
}
