//! SocialHub realtime server.
//!
//! Main entry point that wires the crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use socialhub_core::config::AppConfig;
use socialhub_core::error::AppError;
use socialhub_realtime::RealtimeEngine;
use socialhub_store::{MemoryNotificationStore, MemoryRoomDirectory, MemoryUserDirectory};

#[tokio::main]
async fn main() {
    let env = std::env::var("SOCIALHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SocialHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Collaborator stores ──────────────────────────────
    let users = Arc::new(MemoryUserDirectory::new());
    let notifications = Arc::new(MemoryNotificationStore::new());
    let rooms = Arc::new(MemoryRoomDirectory::new());

    // ── Step 2: Realtime engine ──────────────────────────────────
    let realtime = RealtimeEngine::new(config.realtime.clone(), users, notifications, rooms);

    // ── Step 3: Build and start HTTP server ──────────────────────
    let config = Arc::new(config);
    let app_state = socialhub_api::AppState::new(Arc::clone(&config), realtime.clone());
    let app = socialhub_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("SocialHub server listening on {}", addr);

    // ── Step 4: Graceful shutdown ────────────────────────────────
    let engine = realtime.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, closing WebSocket clients...");
        engine.shutdown().await;
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("SocialHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
