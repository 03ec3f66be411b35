//! # Book Repository
//!
//! Database operations for books.
//!
//! ## Partial Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a BookPatch Becomes SQL                          │
//! │                                                                         │
//! │  BookPatch { title: None, author: Some("F. Herbert"), copies: Some(5) }│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  assignments = ["author = ?", "available_copies = ?"]                  │
//! │       │                                                                 │
//! │       ▼  joined with ", " (never a dangling comma)                      │
//! │  UPDATE Books SET author = ?, available_copies = ? WHERE book_id = ?   │
//! │                                                                         │
//! │  BookPatch::default()  ──► no statement at all (NoChanges)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use futures_util::stream::BoxStream;
use libris_core::{Book, BookPatch};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::executor::{execute, Statement};
use crate::query::{fetch_rows, ResultRow, BOOK_COLUMNS};

static LIST_BOOKS: Statement = Statement::fixed(
    "SELECT book_id, title, author, available_copies FROM Books ORDER BY book_id",
);

/// What an update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The patch was empty; the row was left untouched.
    NoChanges,
    /// The row was updated; carries the number of columns changed.
    Updated { fields: usize },
}

/// Repository for book database operations.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Inserts a new book.
    ///
    /// ## Returns
    /// * `Ok(())` - Book stored
    /// * `Err(DbError::UniqueViolation)` - book_id already exists
    pub async fn insert(&self, book: &Book) -> DbResult<()> {
        debug!(book_id = book.book_id, "Inserting book");

        let stmt = Statement::new(
            "INSERT INTO Books (book_id, title, author, available_copies) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(book.book_id)
        .bind(book.title.as_str())
        .bind(book.author.as_str())
        .bind(book.available_copies);

        execute(&self.pool, &stmt).await?;
        Ok(())
    }

    /// Applies a partial update.
    ///
    /// ## Returns
    /// * `Ok(UpdateOutcome::NoChanges)` - Empty patch, nothing executed
    /// * `Ok(UpdateOutcome::Updated { .. })` - Row updated
    /// * `Err(DbError::NotFound)` - No book with this id
    pub async fn update(&self, book_id: i64, patch: &BookPatch) -> DbResult<UpdateOutcome> {
        let Some(stmt) = update_statement(book_id, patch) else {
            debug!(book_id, "Empty patch, skipping update");
            return Ok(UpdateOutcome::NoChanges);
        };

        debug!(book_id, fields = patch.changed_fields(), "Updating book");

        let outcome = execute(&self.pool, &stmt).await?;
        if !outcome.touched_rows() {
            return Err(DbError::not_found("Book", book_id));
        }

        Ok(UpdateOutcome::Updated {
            fields: patch.changed_fields(),
        })
    }

    /// Deletes a book by id.
    ///
    /// ## Returns
    /// * `Ok(true)` - Book deleted
    /// * `Ok(false)` - No book had this id
    /// * `Err(DbError::ForeignKeyViolation)` - A transaction still references it
    pub async fn delete(&self, book_id: i64) -> DbResult<bool> {
        debug!(book_id, "Deleting book");

        let stmt = Statement::new("DELETE FROM Books WHERE book_id = ?1").bind(book_id);
        let outcome = execute(&self.pool, &stmt).await?;

        Ok(outcome.touched_rows())
    }

    /// Gets a book by id.
    pub async fn get_by_id(&self, book_id: i64) -> DbResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT book_id, title, author, available_copies FROM Books WHERE book_id = ?1",
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Lists all books ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(LIST_BOOKS.sql.as_ref())
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Streams all books as positional rows (see [`BOOK_COLUMNS`]).
    pub fn rows(&self) -> BoxStream<'_, DbResult<ResultRow>> {
        fetch_rows(&self.pool, &LIST_BOOKS, BOOK_COLUMNS)
    }

    /// Counts books (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Books")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Builds the UPDATE for a patch, or `None` if the patch changes nothing.
pub fn update_statement(book_id: i64, patch: &BookPatch) -> Option<Statement> {
    if patch.is_empty() {
        return None;
    }

    let mut assignments = Vec::with_capacity(3);
    let mut stmt = Statement::new("");

    if let Some(title) = &patch.title {
        assignments.push("title = ?");
        stmt = stmt.bind(title.as_str());
    }
    if let Some(author) = &patch.author {
        assignments.push("author = ?");
        stmt = stmt.bind(author.as_str());
    }
    if let Some(copies) = patch.available_copies {
        assignments.push("available_copies = ?");
        stmt = stmt.bind(copies);
    }

    stmt.sql = format!(
        "UPDATE Books SET {} WHERE book_id = ?",
        assignments.join(", ")
    )
    .into();

    Some(stmt.bind(book_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SqlValue;
    use crate::query::Cell;
    use crate::session::{Database, DbConfig};
    use futures_util::TryStreamExt;

    async fn db_with_dune() -> Database {
        let db = Database::connect(DbConfig::in_memory()).await.unwrap();
        db.books()
            .insert(&Book::new(1, "Dune", "Herbert", 3))
            .await
            .unwrap();
        db
    }

    #[test]
    fn test_update_statement_with_no_fields() {
        assert!(update_statement(1, &BookPatch::default()).is_none());
    }

    #[test]
    fn test_update_statement_with_one_field() {
        let patch = BookPatch {
            available_copies: Some(5),
            ..Default::default()
        };
        let stmt = update_statement(7, &patch).unwrap();

        assert_eq!(
            stmt.sql,
            "UPDATE Books SET available_copies = ? WHERE book_id = ?"
        );
        assert_eq!(stmt.params, vec![SqlValue::Integer(5), SqlValue::Integer(7)]);
    }

    #[test]
    fn test_update_statement_with_all_fields() {
        let patch = BookPatch {
            title: Some("Dune Messiah".to_string()),
            author: Some("F. Herbert".to_string()),
            available_copies: Some(2),
        };
        let stmt = update_statement(1, &patch).unwrap();

        assert_eq!(
            stmt.sql,
            "UPDATE Books SET title = ?, author = ?, available_copies = ? WHERE book_id = ?"
        );
        assert_eq!(stmt.params.len(), 4);
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db_with_dune().await;

        let book = db.books().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(book, Book::new(1, "Dune", "Herbert", 3));
        assert!(db.books().get_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let db = db_with_dune().await;

        let err = db
            .books()
            .insert(&Book::new(1, "Emma", "Austen", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_empty_patch_leaves_row_unchanged() {
        let db = db_with_dune().await;

        let outcome = db.books().update(1, &BookPatch::default()).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::NoChanges);
        assert_eq!(
            db.books().get_by_id(1).await.unwrap().unwrap(),
            Book::new(1, "Dune", "Herbert", 3)
        );
    }

    #[tokio::test]
    async fn test_single_field_patch_changes_only_that_field() {
        let db = db_with_dune().await;
        let patch = BookPatch {
            author: Some("Frank Herbert".to_string()),
            ..Default::default()
        };

        let outcome = db.books().update(1, &patch).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated { fields: 1 });
        assert_eq!(
            db.books().get_by_id(1).await.unwrap().unwrap(),
            Book::new(1, "Dune", "Frank Herbert", 3)
        );
    }

    #[tokio::test]
    async fn test_update_missing_book() {
        let db = db_with_dune().await;
        let patch = BookPatch {
            available_copies: Some(1),
            ..Default::default()
        };

        let err = db.books().update(42, &patch).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = db_with_dune().await;

        assert!(db.books().delete(1).await.unwrap());
        assert!(!db.books().delete(1).await.unwrap());
        assert!(db.books().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rows_stream_in_id_order() {
        let db = db_with_dune().await;
        let books = db.books();
        books.insert(&Book::new(3, "Emma", "Austen", 1)).await.unwrap();
        books.insert(&Book::new(2, "Ulysses", "Joyce", 0)).await.unwrap();

        let rows: Vec<ResultRow> = books.rows().try_collect().await.unwrap();
        let ids: Vec<i64> = rows
            .iter()
            .map(|r| r.get(0).and_then(Cell::as_integer).unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(rows[1].get(1), Some(&Cell::Text("Ulysses".to_string())));
        assert_eq!(books.count().await.unwrap(), 3);
    }
}
