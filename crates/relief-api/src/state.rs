//! # Application State
//!
//! Shared state passed to all Axum route handlers. Each collection is a
//! [`Collection`] trait object so the same handlers run against the
//! in-memory backend (development, tests) or Postgres (production).

use std::path::PathBuf;
use std::sync::Arc;

use relief_core::{Collection, Crisis, Donation, Expense, MemoryCollection, Volunteer};
use sqlx::PgPool;

use crate::db::PgStore;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default directory for transient export files.
pub const DEFAULT_REPORTS_DIR: &str = "reports";

/// Application configuration.
///
/// `Debug` redacts the auth token.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer secret. If `None`, authentication is disabled.
    pub auth_token: Option<String>,
    /// Directory where export files are rendered before transfer.
    pub reports_dir: PathBuf,
}

impl AppConfig {
    /// Build configuration from `PORT`, `AUTH_TOKEN` and `REPORTS_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let auth_token = lookup("AUTH_TOKEN").filter(|t| !t.is_empty());
        let reports_dir = lookup("REPORTS_DIR")
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_REPORTS_DIR.to_string())
            .into();
        Self {
            port,
            auth_token,
            reports_dir,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("reports_dir", &self.reports_dir)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            auth_token: None,
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
        }
    }
}

/// Shared application state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    // -- Collections --
    pub volunteers: Arc<dyn Collection<Volunteer>>,
    pub crises: Arc<dyn Collection<Crisis>>,
    pub donations: Arc<dyn Collection<Donation>>,
    pub expenses: Arc<dyn Collection<Expense>>,

    // -- Database (optional) --
    /// Pool behind the collections when running against Postgres. Used by
    /// the readiness probe.
    pub db_pool: Option<PgPool>,

    // -- Configuration --
    pub config: AppConfig,
}

impl AppState {
    /// In-memory state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// In-memory state with the given configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            volunteers: Arc::new(MemoryCollection::<Volunteer>::new()),
            crises: Arc::new(MemoryCollection::<Crisis>::new()),
            donations: Arc::new(MemoryCollection::<Donation>::new()),
            expenses: Arc::new(MemoryCollection::<Expense>::new()),
            db_pool: None,
            config,
        }
    }

    /// Postgres-backed state. Every collection shares `pool`.
    pub fn with_pool(config: AppConfig, pool: PgPool) -> Self {
        let store = PgStore::new(pool.clone());
        Self {
            volunteers: Arc::new(store.clone()),
            crises: Arc::new(store.clone()),
            donations: Arc::new(store.clone()),
            expenses: Arc::new(store),
            db_pool: Some(pool),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &if self.db_pool.is_some() { "postgres" } else { "memory" })
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
