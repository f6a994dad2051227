//! Route definitions.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed));

    let cors = build_cors_layer(&state.config.server);

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use socialhub_core::config::AppConfig;
    use socialhub_core::types::UserId;
    use socialhub_realtime::RealtimeEngine;
    use socialhub_store::{MemoryNotificationStore, MemoryRoomDirectory, MemoryUserDirectory};

    use super::*;

    fn state() -> AppState {
        let config = Arc::new(AppConfig::default());
        let engine = RealtimeEngine::new(
            config.realtime.clone(),
            Arc::new(MemoryUserDirectory::new()),
            Arc::new(MemoryNotificationStore::new()),
            Arc::new(MemoryRoomDirectory::new()),
        );
        AppState::new(config, engine)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(build_router(state()), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_detailed_health_reports_connections() {
        let state = state();
        let _client = state.realtime.connect(UserId::new()).await;

        let (status, body) = get_json(build_router(state), "/api/health/detailed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ws_connections"], 1);
        assert_eq!(body["online_users"], 1);
        assert_eq!(body["metrics"]["connections_total"], 1);
    }

    #[tokio::test]
    async fn test_ws_rejects_non_upgrade_request() {
        let (status, _) = get_json(build_router(state()), "/ws?token=abc").await;
        assert!(status.is_client_error());
    }
}
