//! # Statement Executor
//!
//! Runs one non-query statement (INSERT / UPDATE / DELETE / DDL) against the
//! session and reports what happened.
//!
//! ## Parameter Binding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Values Never Touch the SQL Text                      │
//! │                                                                         │
//! │  Statement::new("INSERT INTO Books (...) VALUES (?1, ?2, ?3, ?4)")     │
//! │      .bind(1)                 ──► ?1  INTEGER                           │
//! │      .bind("It's Dune")       ──► ?2  TEXT (quote stored verbatim)      │
//! │      .bind("Herbert")         ──► ?3  TEXT                              │
//! │      .bind(3)                 ──► ?4  INTEGER                           │
//! │                                                                         │
//! │  execute(pool, &stmt) ──► Ok(ExecOutcome { rows_affected: 1 })         │
//! │                       └─► Err(DbError::UniqueViolation { .. })          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::borrow::Cow;

use chrono::NaiveDate;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

// =============================================================================
// Values
// =============================================================================

/// A value bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
    Date(NaiveDate),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Integer(i64::from(v))
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

// =============================================================================
// Statement
// =============================================================================

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: Cow<'static, str>,
    pub params: Vec<SqlValue>,
}

impl Statement {
    /// Creates a statement with no parameters.
    pub fn new(sql: impl Into<Cow<'static, str>>) -> Self {
        Statement {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a parameterless statement usable in `static` items.
    pub const fn fixed(sql: &'static str) -> Self {
        Statement {
            sql: Cow::Borrowed(sql),
            params: Vec::new(),
        }
    }

    /// Appends the next positional parameter.
    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.params.push(value.into());
        self
    }
}

/// Outcome of a successful non-query statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
}

impl ExecOutcome {
    /// Returns true if at least one row changed.
    pub fn touched_rows(&self) -> bool {
        self.rows_affected > 0
    }
}

// =============================================================================
// Execution
// =============================================================================

/// Binds the statement's parameters onto a sqlx query in order.
pub(crate) fn bind_params<'q>(
    statement: &'q Statement,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    let mut query = sqlx::query(statement.sql.as_ref());

    for param in &statement.params {
        query = match param {
            SqlValue::Null => query.bind(None::<i64>),
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Text(s) => query.bind(s.as_str()),
            SqlValue::Date(d) => query.bind(*d),
        };
    }

    query
}

/// Prepares, binds and executes a non-query statement.
///
/// ## Returns
/// * `Ok(ExecOutcome)` - Statement ran; carries the affected row count
/// * `Err(DbError)` - Statement failed; nothing is swallowed
pub async fn execute(pool: &SqlitePool, statement: &Statement) -> DbResult<ExecOutcome> {
    debug!(sql = %statement.sql, params = statement.params.len(), "Executing statement");

    match bind_params(statement).execute(pool).await {
        Ok(result) => {
            let outcome = ExecOutcome {
                rows_affected: result.rows_affected(),
            };
            debug!(rows_affected = outcome.rows_affected, "Statement executed");
            Ok(outcome)
        }
        Err(e) => {
            let err = DbError::from(e);
            warn!(error = %err, sql = %statement.sql, "Statement failed");
            Err(err)
        }
    }
}
