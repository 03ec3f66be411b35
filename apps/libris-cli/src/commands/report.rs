//! # Report Commands
//!
//! Menu entries 8-9. Rows are drawn as the query reader yields them.

use std::io::{BufRead, Write};

use futures_util::stream::BoxStream;
use futures_util::TryStreamExt;
use libris_db::{Database, DbResult, ResultRow};
use tracing::debug;

use crate::console::Console;
use crate::display::{TableLayout, BOOK_TABLE, TRANSACTION_TABLE};
use crate::error::CliResult;

/// Prints every book.
pub async fn display_books<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let books = db.books();
    print_table(&BOOK_TABLE, books.rows(), console).await
}

/// Prints every transaction. An open loan has a blank return date.
pub async fn display_transactions<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let transactions = db.transactions();
    print_table(&TRANSACTION_TABLE, transactions.rows(), console).await
}

async fn print_table<R: BufRead, W: Write>(
    layout: &TableLayout,
    mut rows: BoxStream<'_, DbResult<ResultRow>>,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    layout.write_header(console.output())?;

    let mut count = 0usize;
    while let Some(row) = rows.try_next().await? {
        layout.write_row(console.output(), &row)?;
        count += 1;
    }

    debug!(caption = layout.caption, rows = count, "Table printed");
    Ok(())
}
