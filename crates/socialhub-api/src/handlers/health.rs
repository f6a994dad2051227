//! Health check handlers.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use socialhub_realtime::metrics::MetricsSnapshot;

use crate::state::AppState;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

/// Detailed health with hub state.
#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    /// `"ok"`, or `"degraded"` once the hub loop has stopped.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Seconds since the process started.
    pub uptime_seconds: u64,
    /// Registered WebSocket clients.
    pub ws_connections: usize,
    /// Users with at least one client.
    pub online_users: usize,
    /// Realtime counters.
    pub metrics: MetricsSnapshot,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let hub = &state.realtime.hub;
    let stats = hub.stats().await;

    Json(DetailedHealthResponse {
        status: if hub.is_running() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        ws_connections: stats.clients,
        online_users: stats.users,
        metrics: state.realtime.metrics.snapshot(),
    })
}
