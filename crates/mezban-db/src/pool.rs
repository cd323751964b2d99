//! # Store Handle & Connection Pool
//!
//! Connection pool creation and configuration for the SQLite ledger.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Store Lifecycle                                │
//! │                                                                     │
//! │  App Startup                                                        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreConfig::new(path) ← Configure pool settings                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Store::open(config).await ← Create pool + run migrations           │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  One owned Store for the process lifetime, injected into every      │
//! │  caller. NEVER a global: the owner decides who gets access.         │
//! │                                                                     │
//! │  Reads (list/analytics) share pooled connections; the sale          │
//! │  recorder and snapshot import are the only writers that need        │
//! │  multi-step atomicity, and both get it (transaction / file swap).   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for file-backed
//! stores: readers don't block the writer, and a sale mid-commit is
//! invisible until its transaction completes - exactly the isolation
//! the analytics queries rely on.

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::repository::analytics::AnalyticsRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::settings::SettingsRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/mezban.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (sufficient for a single-terminal POS)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Creates a new configuration with the given database path.
    /// The file is created on first open if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory store configuration (for testing).
    ///
    /// The pool is pinned to a single connection because every SQLite
    /// in-memory connection is its own database.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    /// Whether this configuration describes an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// One owned instance per process. Repositories clone the pool, so read
/// paths are cheap; snapshot import needs `&mut` because it swaps the
/// underlying file and rebuilds the pool.
#[derive(Debug)]
pub struct Store {
    config: StoreConfig,
    pool: SqlitePool,
}

impl Store {
    /// Opens the store: builds the pool and (by default) migrates.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite for a local POS workload:
    ///    - WAL mode for concurrent reads (file-backed stores)
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled (sale_items cascade with their sale)
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled), seeding default settings
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening store"
        );

        let pool = connect(&config).await?;

        debug!(
            max_connections = config.max_connections,
            "Store pool created"
        );

        let store = Store { config, pool };

        if store.config.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Runs pending schema migrations.
    ///
    /// Idempotent: tracked in `_sqlx_migrations`, and the SQL itself is
    /// `IF NOT EXISTS` so a database restored from an older snapshot
    /// upgrades cleanly.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    ///
    /// For queries not covered by the repositories. Prefer repository
    /// methods when available.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The configured database path (`:memory:` for test stores).
    pub fn path(&self) -> &Path {
        &self.config.database_path
    }

    pub(crate) fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Returns the settings repository.
    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.pool.clone())
    }

    /// Returns the sale repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Returns the analytics repository.
    pub fn analytics(&self) -> AnalyticsRepository {
        AnalyticsRepository::new(self.pool.clone())
    }

    /// Checks if the store is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the connection pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing store connection pool");
        self.pool.close().await;
    }

    /// Detaches from the current database file and reconnects.
    ///
    /// Used by snapshot import after swapping the file on disk. The old
    /// pool must already be closed; migrations rerun per the config so
    /// an imported older snapshot is upgraded in place.
    pub(crate) async fn reconnect(&mut self) -> StoreResult<()> {
        self.pool = connect(&self.config).await?;
        if self.config.run_migrations {
            self.run_migrations().await?;
        }
        Ok(())
    }
}

/// Builds a pool for the given configuration.
async fn connect(config: &StoreConfig) -> StoreResult<SqlitePool> {
    let connect_options = if config.is_in_memory() {
        // Private in-memory database; journal mode is irrelevant here.
        SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true)
    } else {
        SqliteConnectOptions::new()
            .filename(&config.database_path)
            // WAL mode: readers don't block the writer and vice versa
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: safe from corruption; at most the last
            // transaction is lost on power failure
            .synchronous(SqliteSynchronous::Normal)
            // SQLite ships with foreign keys off; the cascade from sales
            // to sale_items depends on them
            .foreign_keys(true)
            .create_if_missing(true)
    };

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(Some(config.idle_timeout))
        .connect_with(connect_options)
        .await
        .map_err(|e| StoreError::storage("open_store", e))
}

// =============================================================================
// Unit Tests
// =============================================================================
