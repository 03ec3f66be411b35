//! # Transaction Repository
//!
//! Issue and return records.
//!
//! ## Lifecycle of a Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Issue → Return                                       │
//! │                                                                         │
//! │  issue(NewIssue)                                                       │
//! │       │  INSERT ... return_date = NULL, status = 'Issued'              │
//! │       ▼                                                                 │
//! │  ┌──────────────┐                                                       │
//! │  │   Issued     │                                                       │
//! │  └──────┬───────┘                                                       │
//! │         │ mark_returned(id, date)                                       │
//! │         │  UPDATE ... return_date = date, status = 'Returned'          │
//! │         ▼                                                               │
//! │  ┌──────────────┐                                                       │
//! │  │   Returned   │ ── mark_returned again overwrites the date            │
//! │  └──────────────┘                                                       │
//! │                                                                         │
//! │  Book copy counts are not touched by either step.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use futures_util::stream::BoxStream;
use libris_core::{NewIssue, Transaction, TransactionStatus};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::executor::{execute, Statement};
use crate::query::{fetch_rows, ResultRow, TRANSACTION_COLUMNS};

static LIST_TRANSACTIONS: Statement = Statement::fixed(
    "SELECT transaction_id, user_id, book_id, issue_date, return_date, status \
     FROM Transactions ORDER BY transaction_id",
);

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Records a book being issued to a user.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - The stored record (no return date, status Issued)
    /// * `Err(DbError::UniqueViolation)` - transaction_id already exists
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown user or book
    pub async fn issue(&self, issue: &NewIssue) -> DbResult<Transaction> {
        debug!(
            transaction_id = issue.transaction_id,
            user_id = issue.user_id,
            book_id = issue.book_id,
            "Issuing book"
        );

        let stmt = Statement::new(
            "INSERT INTO Transactions \
             (transaction_id, user_id, book_id, issue_date, return_date, status) \
             VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
        )
        .bind(issue.transaction_id)
        .bind(issue.user_id)
        .bind(issue.book_id)
        .bind(issue.issue_date)
        .bind(TransactionStatus::Issued.as_str());

        execute(&self.pool, &stmt).await?;

        Ok(issue.clone().into_transaction())
    }

    /// Records a return.
    ///
    /// ## Returns
    /// * `Ok(true)` - Transaction updated
    /// * `Ok(false)` - No transaction had this id
    pub async fn mark_returned(&self, transaction_id: i64, return_date: NaiveDate) -> DbResult<bool> {
        debug!(transaction_id, %return_date, "Marking transaction returned");

        let stmt = Statement::new(
            "UPDATE Transactions SET return_date = ?1, status = ?2 WHERE transaction_id = ?3",
        )
        .bind(return_date)
        .bind(TransactionStatus::Returned.as_str())
        .bind(transaction_id);

        let outcome = execute(&self.pool, &stmt).await?;
        Ok(outcome.touched_rows())
    }

    /// Gets a transaction by id.
    pub async fn get_by_id(&self, transaction_id: i64) -> DbResult<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            "SELECT transaction_id, user_id, book_id, issue_date, return_date, status \
             FROM Transactions WHERE transaction_id = ?1",
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Lists all transactions ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(LIST_TRANSACTIONS.sql.as_ref())
            .fetch_all(&self.pool)
            .await?;

        Ok(transactions)
    }

    /// Streams all transactions as positional rows (see [`TRANSACTION_COLUMNS`]).
    pub fn rows(&self) -> BoxStream<'_, DbResult<ResultRow>> {
        fetch_rows(&self.pool, &LIST_TRANSACTIONS, TRANSACTION_COLUMNS)
    }
}
