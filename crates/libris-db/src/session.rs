//! # Session Management
//!
//! Opens, owns and releases the single database connection used for the
//! whole run of the program.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One Session per Process                            │
//! │                                                                         │
//! │  Startup                                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Target comes from configuration                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::connect(config).await                                       │
//! │       ├── open exactly one SQLite connection                           │
//! │       ├── foreign keys ON, WAL, NORMAL sync                            │
//! │       └── ensure_schema() (if enabled)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Commands run one after another on the same connection                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.disconnect().await ← consumes the handle, so it runs once          │
//! │  (dropping the handle without calling it also releases the connection) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Connection failure is returned as [`DbError::ConnectionFailed`]; the
//! console treats it as fatal.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::executor::{self, ExecOutcome, Statement};
use crate::repository::book::BookRepository;
use crate::repository::transaction::TransactionRepository;
use crate::repository::user::UserRepository;
use crate::schema;

/// Path value selecting a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/libris/libris.db")
///     .connect_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// How long to wait for the connection to open.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Whether to create missing tables on connect.
    /// Default: true
    pub init_schema: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            connect_timeout: Duration::from_secs(30),
            init_schema: true,
        }
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to create missing tables on connect.
    pub fn init_schema(mut self, init: bool) -> Self {
        self.init_schema = init;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::connect(DbConfig::in_memory()).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            connect_timeout: Duration::from_secs(5),
            init_schema: true,
        }
    }

    /// Returns true if this targets an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY_PATH)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                // WAL mode: durable writes without blocking the reader
                .journal_mode(SqliteJournalMode::Wal)
        };

        Ok(options
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has foreign keys disabled by default
            .foreign_keys(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// The open session: one connection plus repository access.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::connect(DbConfig::new("./libris.db")).await?;
/// db.books().insert(&Book::new(1, "Dune", "Herbert", 3)).await?;
/// db.disconnect().await;
/// ```
#[derive(Debug)]
pub struct Database {
    /// Pool capped at a single connection that never expires.
    pool: SqlitePool,
}

impl Database {
    /// Opens the session.
    ///
    /// ## What This Does
    /// 1. Opens (and creates, for files) the database
    /// 2. Enables foreign keys, WAL journal, NORMAL synchronous
    /// 3. Keeps exactly one connection open until disconnect
    /// 4. Creates missing tables (if enabled)
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use session
    /// * `Err(DbError::ConnectionFailed)` - The database couldn't be opened
    /// * `Err(DbError::SchemaFailed)` - A table couldn't be created
    pub async fn connect(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Connecting to database"
        );

        let connect_options = config.connect_options()?;
        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            // The session lives as long as the process; an in-memory
            // database would be lost if its connection were recycled
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!("Connected to database");

        let db = Database { pool };

        if config.init_schema {
            db.ensure_schema().await?;
        }

        Ok(db)
    }

    /// Creates missing tables. Safe to call repeatedly.
    pub async fn ensure_schema(&self) -> DbResult<()> {
        schema::ensure_schema(&self.pool).await
    }

    /// Runs a non-query statement on this session.
    pub async fn execute(&self, statement: &Statement) -> DbResult<ExecOutcome> {
        executor::execute(&self.pool, statement).await
    }

    /// Returns a reference to the underlying pool.
    ///
    /// ## Usage
    /// For queries not covered by repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the book repository.
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    /// Returns the user repository.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Returns the transaction repository.
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone())
    }

    /// Checks if the session can still execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Ends the session and releases the connection.
    ///
    /// Takes `self` so the release happens exactly once.
    pub async fn disconnect(self) {
        info!("Disconnecting from database");
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
        db.disconnect().await;
    }

    #[tokio::test]
    async fn test_in_memory_state_persists_across_statements() {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();

        db.execute(&Statement::new("INSERT INTO Users VALUES (1, 'Alice', 'alice@x.com')"))
            .await
            .unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Users")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_file_database_is_created_and_reopened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libris.db");

        let db = Database::connect(DbConfig::new(&path)).await.unwrap();
        db.execute(&Statement::new("INSERT INTO Books VALUES (1, 'Dune', 'Herbert', 3)"))
            .await
            .unwrap();
        db.disconnect().await;
        assert!(path.exists());

        let db = Database::connect(DbConfig::new(&path)).await.unwrap();
        let title: String = sqlx::query_scalar("SELECT title FROM Books WHERE book_id = 1")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(title, "Dune");
    }

    #[tokio::test]
    async fn test_unreachable_target_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("libris.db");

        let err = Database::connect(DbConfig::new(path)).await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_foreign_keys_are_enforced() {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .connect_timeout(Duration::from_secs(3))
            .init_schema(false);

        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert!(!config.init_schema);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
