//! # Query Reader
//!
//! Runs a SELECT and yields its rows one at a time, decoding each column by
//! position against a fixed descriptor list.
//!
//! ## How Rows Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Positional Decoding                              │
//! │                                                                         │
//! │  BOOK_COLUMNS                    SQLite row                             │
//! │  ───────────────────────         ──────────────────────────             │
//! │  0  book_id   Integer       ◄──  1                                      │
//! │  1  title     Text(256)     ◄──  "Dune"                                 │
//! │  2  author    Text(256)     ◄──  "Herbert"                              │
//! │  3  copies    Integer       ◄──  3                                      │
//! │                                                                         │
//! │  fetch_rows() ──► prepare ──► column count == descriptors?             │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │                   stream ──► next() ──► ResultRow ──► next() ──► None   │
//! │                   (lazy: the driver is asked for one row at a time)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Text longer than its column's `max_len` is clipped with a visible marker
//! (see [`libris_core::text::bounded`]).

use std::fmt;

use futures_util::stream::{self, BoxStream, StreamExt, TryStreamExt};
use libris_core::text::bounded;
use libris_core::{MAX_DATE_LEN, MAX_STATUS_LEN, MAX_TEXT_LEN};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor as _, Row, SqlitePool, Statement as _};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::executor::{bind_params, Statement};

// =============================================================================
// Column Descriptors
// =============================================================================

/// How a column is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text { max_len: usize },
}

/// Describes one output column of a SELECT, by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl ColumnDef {
    pub const fn integer(name: &'static str) -> Self {
        ColumnDef {
            name,
            kind: ColumnKind::Integer,
        }
    }

    pub const fn text(name: &'static str, max_len: usize) -> Self {
        ColumnDef {
            name,
            kind: ColumnKind::Text { max_len },
        }
    }
}

/// Columns of `SELECT book_id, title, author, available_copies FROM Books`.
pub const BOOK_COLUMNS: &[ColumnDef] = &[
    ColumnDef::integer("book_id"),
    ColumnDef::text("title", MAX_TEXT_LEN),
    ColumnDef::text("author", MAX_TEXT_LEN),
    ColumnDef::integer("available_copies"),
];

/// Columns of the transaction listing.
pub const TRANSACTION_COLUMNS: &[ColumnDef] = &[
    ColumnDef::integer("transaction_id"),
    ColumnDef::integer("user_id"),
    ColumnDef::integer("book_id"),
    ColumnDef::text("issue_date", MAX_DATE_LEN),
    ColumnDef::text("return_date", MAX_DATE_LEN),
    ColumnDef::text("status", MAX_STATUS_LEN),
];

// =============================================================================
// Rows
// =============================================================================

/// A decoded column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Null,
    Integer(i64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// NULL renders as an empty string.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Integer(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// One decoded result row, in descriptor order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    cells: Vec<Cell>,
}

impl ResultRow {
    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

}

// =============================================================================
// Reading
// =============================================================================

/// Runs `statement` and returns a lazy stream of decoded rows.
///
/// Nothing is fetched until the stream is polled; each poll pulls the next
/// row from the driver. The stream ends when the driver reports no more rows.
///
/// The first poll prepares the statement and fails with
/// [`DbError::ColumnMismatch`] if its result columns don't line up with
/// `columns`, even when the query would return no rows.
///
/// ## Example
/// ```rust,ignore
/// let stmt = Statement::fixed("SELECT book_id, title, author, available_copies FROM Books");
/// let mut rows = fetch_rows(db.pool(), &stmt, BOOK_COLUMNS);
/// while let Some(row) = rows.try_next().await? {
///     println!("{}", row.get(1).unwrap());
/// }
/// ```
pub fn fetch_rows<'a>(
    pool: &'a SqlitePool,
    statement: &'a Statement,
    columns: &'a [ColumnDef],
) -> BoxStream<'a, DbResult<ResultRow>> {
    debug!(sql = %statement.sql, columns = columns.len(), "Reading rows");

    let rows = async move {
        let prepared = pool.prepare(statement.sql.as_ref()).await?;
        check_columns(prepared.columns().len(), columns)?;

        Ok::<_, DbError>(bind_params(statement).fetch(pool).map(move |row| {
            row.map_err(DbError::from)
                .and_then(|row| decode_row(&row, columns))
        }))
    };

    stream::once(rows).try_flatten().boxed()
}

/// Drains [`fetch_rows`] into a vector.
pub async fn collect_rows(
    pool: &SqlitePool,
    statement: &Statement,
    columns: &[ColumnDef],
) -> DbResult<Vec<ResultRow>> {
    fetch_rows(pool, statement, columns).try_collect().await
}

fn check_columns(actual: usize, columns: &[ColumnDef]) -> DbResult<()> {
    if actual != columns.len() {
        return Err(DbError::ColumnMismatch {
            expected: columns.len(),
            actual,
        });
    }
    Ok(())
}

fn decode_row(row: &SqliteRow, columns: &[ColumnDef]) -> DbResult<ResultRow> {
    let cells = columns
        .iter()
        .enumerate()
        .map(|(index, column)| decode_cell(row, index, column))
        .collect::<DbResult<Vec<_>>>()?;

    Ok(ResultRow { cells })
}

fn decode_cell(row: &SqliteRow, index: usize, column: &ColumnDef) -> DbResult<Cell> {
    let undecodable = |e: sqlx::Error| DbError::ColumnDecode {
        column: column.name,
        message: e.to_string(),
    };

    let cell = match column.kind {
        ColumnKind::Integer => row
            .try_get::<Option<i64>, _>(index)
            .map_err(undecodable)?
            .map_or(Cell::Null, Cell::Integer),
        ColumnKind::Text { max_len } => row
            .try_get::<Option<String>, _>(index)
            .map_err(undecodable)?
            .map_or(Cell::Null, |s| Cell::Text(bounded(&s, max_len).into_owned())),
    };
    Ok(cell)
}
