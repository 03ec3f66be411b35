//! # Schema Initializer
//!
//! Creates the three library tables if they are absent.
//!
//! ## Creation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Schema Setup on Connect                            │
//! │                                                                         │
//! │  1. Books         (no dependencies)                                    │
//! │  2. Users         (no dependencies)                                    │
//! │  3. Transactions  (FOREIGN KEY → Users, FOREIGN KEY → Books)           │
//! │                                                                         │
//! │  Each statement is CREATE TABLE IF NOT EXISTS:                         │
//! │  • table already there  → nothing happens, not an error                │
//! │  • any other failure    → DbError::SchemaFailed, setup stops           │
//! │                                                                         │
//! │  Tables created before a failure stay; re-running is always safe.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::executor::{execute, Statement};

const CREATE_BOOKS: &str = r#"
CREATE TABLE IF NOT EXISTS Books (
    book_id          INTEGER PRIMARY KEY,
    title            VARCHAR(256) NOT NULL,
    author           VARCHAR(256) NOT NULL,
    available_copies INTEGER NOT NULL
)
"#;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS Users (
    user_id      INTEGER PRIMARY KEY,
    name         VARCHAR(256) NOT NULL,
    contact_info VARCHAR(256) NOT NULL
)
"#;

const CREATE_TRANSACTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS Transactions (
    transaction_id INTEGER PRIMARY KEY,
    user_id        INTEGER NOT NULL,
    book_id        INTEGER NOT NULL,
    issue_date     DATE NOT NULL,
    return_date    DATE,
    status         VARCHAR(50) NOT NULL,
    FOREIGN KEY (user_id) REFERENCES Users(user_id),
    FOREIGN KEY (book_id) REFERENCES Books(book_id)
)
"#;

/// Library tables in creation order.
pub const TABLES: [(&str, &str); 3] = [
    ("Books", CREATE_BOOKS),
    ("Users", CREATE_USERS),
    ("Transactions", CREATE_TRANSACTIONS),
];

/// Creates any missing library tables.
///
/// ## Safety
/// - Idempotent: safe to run multiple times
/// - Ordered: Transactions is created last because of its foreign keys
/// - Not atomic: a failure leaves earlier tables in place
pub async fn ensure_schema(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking and creating tables if necessary");

    for (table, ddl) in TABLES {
        execute(pool, &Statement::new(ddl))
            .await
            .map_err(|e| DbError::SchemaFailed {
                table: table.to_string(),
                message: e.to_string(),
            })?;
        info!(table, "Table created or already exists");
    }

    Ok(())
}

/// Returns true if a table with this name exists.
pub async fn table_exists(pool: &SqlitePool, name: &str) -> DbResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    debug!(table = name, exists = count > 0, "Checked table");
    Ok(count > 0)
}

/// Counts user tables (SQLite's internal tables excluded).
///
/// ## Usage
/// For diagnostics and health checks.
pub async fn table_count(pool: &SqlitePool) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
