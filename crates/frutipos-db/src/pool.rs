//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new(path)              ← Configure pool settings            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await      ← Create pool + run migrations       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.products() / db.sales() / db.expenses() / db.config()              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CollectionStore (shares the pool)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File databases use WAL mode so report queries never block the register.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::config::ConfigRepository;
use crate::repository::expense::ExpenseRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::store::CollectionStore;

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/frutipos.db").max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
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

impl DbConfig {
    /// Creates a configuration for the file at `path`. The file is created
    /// if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
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

    /// An isolated in-memory database for tests.
    ///
    /// Uses a single connection that is never recycled, since every
    /// connection to `:memory:` opens a different database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    /// Whether this configuration points at `:memory:`.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone; every clone shares the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, if enabled, applies pending migrations.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures WAL mode and NORMAL synchronous for file databases
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        debug!("Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout);

        pool_options = if config.is_in_memory() {
            pool_options.idle_timeout(None).max_lifetime(None)
        } else {
            pool_options.idle_timeout(Some(config.idle_timeout))
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Raw collection access shared by every repository.
    pub fn store(&self) -> CollectionStore {
        CollectionStore::new(self.pool.clone())
    }

    /// Returns the product repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let papaya = db.products().find_by_barcode("1003").await?;
    /// ```
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.store())
    }

    /// Returns the sale repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.store())
    }

    /// Returns the expense repository.
    pub fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new(self.store())
    }

    /// Returns the store configuration repository.
    pub fn config(&self) -> ConfigRepository {
        ConfigRepository::new(self.store())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Whether the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
