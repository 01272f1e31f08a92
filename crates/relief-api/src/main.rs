//! # relief-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the relief back office.
//! Binds to `0.0.0.0` on `PORT` (default 8080).

use relief_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env();
    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set, authentication disabled: every caller is admin");
    }

    // Database pool is optional; without it collections live in memory.
    let db_pool = relief_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    let port = config.port;
    tracing::info!(config = ?config, "configuration loaded");
    let state = match db_pool {
        Some(pool) => AppState::with_pool(config, pool),
        None => AppState::with_config(config),
    };

    let app = relief_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("relief API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Structured tracing: `RUST_LOG` filter (default `info`), JSON lines when
/// `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}
