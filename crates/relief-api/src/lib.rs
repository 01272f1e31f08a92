//! # relief-api: Axum Service for the Relief Administration Back Office
//!
//! ## API Surface
//!
//! | Prefix           | Module                   | Access        |
//! |------------------|--------------------------|---------------|
//! | `/volunteers*`   | [`routes::volunteers`]   | admin         |
//! | `/crises*`       | [`routes::crises`]       | admin         |
//! | `/reports*`      | [`routes::reports`]      | admin         |
//! | `/health/*`      | this module              | public        |
//! | `/openapi.json`  | [`openapi`]              | public        |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → RequireAdmin → Handler
//! ```

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Maximum accepted request body.
const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes and the OpenAPI document are mounted outside the auth
/// middleware so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    // Authenticated back-office routes.
    let admin = Router::new()
        .merge(routes::volunteers::router())
        .merge(routes::crises::router())
        .merge(routes::reports::router())
        .layer(from_fn(auth::require_admin))
        .layer(from_fn(auth::auth_middleware))
        .layer(axum::Extension(auth_config))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    // Unauthenticated probes and docs.
    let public = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(openapi::router());

    Router::new()
        .merge(public)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 503 when the database is configured but not answering.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if let Some(pool) = &state.db_pool {
        if let Err(e) = db::ping(pool).await {
            tracing::warn!(error = %e, "readiness check failed");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unavailable");
        }
    }
    (StatusCode::OK, "ready")
}
