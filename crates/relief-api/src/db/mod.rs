//! # Database Persistence Layer
//!
//! Postgres backend for the four record collections via SQLx.
//!
//! The database is **optional**. When `DATABASE_URL` is set, every
//! collection is served by [`PgStore`]. When absent, the API runs on the
//! in-memory backend and state does not survive restarts.
//!
//! Each table carries a `seq BIGSERIAL` column; listing orders by it so
//! results come back in insertion order on both backends.

pub mod crises;
pub mod donations;
pub mod expenses;
pub mod volunteers;

use relief_core::StoreError;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            tracing::warn!(
                "DATABASE_URL not set, running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Check that the database answers a trivial query.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Postgres-backed [`relief_core::Collection`] for every record type.
///
/// Cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an initialized pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map an SQLx error on `collection` into a [`StoreError`].
fn backend(collection: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |err| StoreError::Backend {
        collection,
        message: err.to_string(),
    }
}
