//! # Database Pool Management
//!
//! Scoped acquisition of the SQLite connection pool.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Handle Lifecycle                          │
//! │                                                                         │
//! │  DbConfig::new(path) ← Configure pool settings                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::open(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                            │
//! │  │            SqlitePool                   │                            │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐               │                            │
//! │  │  │Conn1│ │Conn2│ │Conn3│ ...           │  (max_connections)         │
//! │  │  └─────┘ └─────┘ └─────┘               │                            │
//! │  └─────────────────────────────────────────┘                            │
//! │       │                                                                 │
//! │       ├──► db.carts()   ── CartRepository                               │
//! │       ├──► db.movies()  ── MovieRepository                              │
//! │       ▼                                                                 │
//! │  db.close().await ← Release every connection                            │
//! │                                                                         │
//! │  Database::scoped(config, |db| async { ... }) runs open → f → close     │
//! │  and closes whether `f` succeeded or failed.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no global handle. Whoever opens the database passes it on
//! explicitly and is responsible for closing it.
//!
//! ## WAL Mode
//! File databases use WAL so the CLI and the seed binary can read while the
//! other writes. In-memory databases keep SQLite's default journal.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::cart::CartRepository;
use crate::repository::movie::MovieRepository;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust
/// use marquee_db::DbConfig;
///
/// let config = DbConfig::new("/tmp/marquee.db").max_connections(2);
/// assert_eq!(config.max_connections, 2);
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

    /// Whether to run migrations on open.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created on open if it doesn't exist; its parent directory
    /// must exist.
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

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for tests and demos).
    ///
    /// Every pool gets its own empty database, which lives exactly as long
    /// as the pool's single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()));
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.database_path)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Database handle providing repository access.
///
/// Cloning is cheap and shares the pool; closing any clone closes them all.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the connection pool and runs migrations.
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError)` - Connection or migration failed
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening database"
        );

        let connect_options = config.connect_options()?;

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout);

        // An in-memory database disappears with its last connection
        pool_options = if config.is_in_memory() {
            pool_options.idle_timeout(None::<Duration>).max_lifetime(None::<Duration>)
        } else {
            pool_options.idle_timeout(Some(config.idle_timeout))
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Database pool created");

        let db = Database { pool };

        if config.run_migrations {
            if let Err(e) = db.run_migrations().await {
                db.close().await;
                return Err(e);
            }
        }

        Ok(db)
    }

    /// Opens the database, runs `f` with it, and closes it afterwards.
    ///
    /// The pool is closed on both the success and the error path; the
    /// result of `f` is returned unchanged.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let ids = Database::scoped(DbConfig::in_memory(), |db| async move {
    ///     db.carts().list_ids().await
    /// })
    /// .await?;
    /// ```
    pub async fn scoped<F, Fut, T, E>(config: DbConfig, f: F) -> Result<T, E>
    where
        F: FnOnce(Database) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<DbError>,
    {
        let db = Database::open(config).await?;
        let result = f(db.clone()).await;
        db.close().await;
        result
    }

    /// Applies pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the cart repository.
    pub fn carts(&self) -> CartRepository {
        CartRepository::new(self.pool.clone())
    }

    /// Returns the movie cache repository.
    pub fn movies(&self) -> MovieRepository {
        MovieRepository::new(self.pool.clone())
    }

    /// Closes the connection pool.
    ///
    /// After calling close, all repository operations fail with
    /// `DbError::ConnectionFailed`.
    pub async fn close(&self) {
        if !self.pool.is_closed() {
            info!("Closing database connection pool");
            self.pool.close().await;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        db.close().await;
        assert!(db.is_closed());
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db").max_connections(10).run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_scoped_closes_on_success() {
        let mut captured = None;

        let count = Database::scoped(DbConfig::in_memory(), |db| {
            captured = Some(db.clone());
            async move { db.movies().count().await }
        })
        .await
        .unwrap();

        assert_eq!(count, 0);
        assert!(captured.unwrap().is_closed());
    }

    #[tokio::test]
    async fn test_scoped_closes_on_error() {
        let mut captured = None;

        let result: DbResult<()> = Database::scoped(DbConfig::in_memory(), |db| {
            captured = Some(db.clone());
            async move {
                db.carts().get("missing").await?;
                Ok(())
            }
        })
        .await;

        assert!(matches!(result, Err(DbError::NotFound { .. })));
        assert!(captured.unwrap().is_closed());
    }

    #[tokio::test]
    async fn test_open_fails_for_missing_directory() {
        let config = DbConfig::new("/nonexistent-marquee-dir/sub/marquee.db");

        assert!(matches!(
            Database::open(config).await,
            Err(DbError::ConnectionFailed(_))
        ));
    }
}
