//! # Market API
//!
//! HTTP server for the geo-aware marketplace backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Market API Server                               │
//! │                                                                         │
//! │  Client ───► HTTP (8000) ───► x-api-key gate ───► Routes ───► Postgres │
//! │                                                      │                  │
//! │                                                      ▼                  │
//! │                                                market-core              │
//! │                                               (pure logic)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod config;
mod error;
mod mailer;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use market_db::{Database, DbConfig};

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use crate::mailer::{LogMailer, OtpMailer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Market API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.http_port,
        db_url = %config.database_url.chars().take(30).collect::<String>(),
        "Configuration loaded"
    );

    // Connect to database and run migrations
    let db = Database::new(DbConfig::new(&config.database_url)).await?;
    info!("Connected to PostgreSQL");

    // Create shared state
    let state = Arc::new(AppState {
        db,
        jwt: JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs),
        mailer: Box::new(LogMailer),
        config,
    });

    // Build server address
    let addr: SocketAddr = format!("0.0.0.0:{}", state.config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    // Start server
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Shared application state.
///
/// The store client is injected here once at startup; handlers receive it
/// through axum's `State` extractor rather than through any global.
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub mailer: Box<dyn OtpMailer>,
    pub config: ApiConfig,
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
