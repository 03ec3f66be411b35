//! # Book Commands
//!
//! Menu entries 1-3: add, update and delete a book.

use std::io::{BufRead, Write};

use libris_core::validation::{validate_book, validate_id, validate_patch};
use libris_core::{Book, BookPatch};
use libris_db::{Database, UpdateOutcome};
use tracing::info;

use crate::console::Console;
use crate::error::CliResult;

/// Prompts for a new book and inserts it.
pub async fn add_book<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let book_id = console.prompt_int("Enter Book ID: ", "book_id")?;
    let title = console.prompt("Enter Book Title: ")?;
    let author = console.prompt("Enter Author Name: ")?;
    let copies = console.prompt_int("Enter Available Copies: ", "available_copies")?;

    let book = Book::new(book_id, title.trim(), author.trim(), copies);
    validate_book(&book)?;

    db.books().insert(&book).await?;
    info!(book_id, "Book added");
    console.say("Book added.")
}

/// Prompts for a partial update. Empty text and -1 keep the current value.
pub async fn update_book<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let book_id = console.prompt_int("Enter Book ID to Update: ", "book_id")?;
    let title = console.prompt("Enter New Title (Leave empty to keep the current): ")?;
    let author = console.prompt("Enter New Author (Leave empty to keep the current): ")?;
    let copies = console.prompt_int(
        "Enter New Available Copies (Enter -1 to keep the current): ",
        "available_copies",
    )?;

    validate_id("book_id", book_id)?;
    let patch = BookPatch::from_prompts(&title, &author, copies);
    validate_patch(&patch)?;

    match db.books().update(book_id, &patch).await? {
        UpdateOutcome::NoChanges => console.say("No changes requested."),
        UpdateOutcome::Updated { fields } => {
            info!(book_id, fields, "Book updated");
            console.say("Book updated.")
        }
    }
}

/// Prompts for an id and deletes that book.
pub async fn delete_book<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let book_id = console.prompt_int("Enter Book ID to Delete: ", "book_id")?;

    if db.books().delete(book_id).await? {
        info!(book_id, "Book deleted");
        console.say("Book deleted.")
    } else {
        console.say(format!("No book with ID {book_id}."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{memory_db, output, scripted};
    use crate::error::CliError;
    use libris_db::DbError;

    async fn db_with_dune() -> Database {
        let db = memory_db().await;
        db.books().insert(&Book::new(1, "Dune", "Herbert", 3)).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_add_book() {
        let db = memory_db().await;
        let mut console = scripted(&["1", "Dune", "Herbert", "3"]);

        add_book(&db, &mut console).await.unwrap();

        assert!(output(console).ends_with("Book added.\n"));
        assert_eq!(
            db.books().get_by_id(1).await.unwrap(),
            Some(Book::new(1, "Dune", "Herbert", 3))
        );
    }

    #[tokio::test]
    async fn test_add_book_keeps_quotes() {
        let db = memory_db().await;
        let mut console = scripted(&["2", "Winter's Tale", "O'Brien", "1"]);

        add_book(&db, &mut console).await.unwrap();

        let book = db.books().get_by_id(2).await.unwrap().unwrap();
        assert_eq!(book.title, "Winter's Tale");
        assert_eq!(book.author, "O'Brien");
    }

    #[tokio::test]
    async fn test_add_book_rejects_bad_input() {
        let db = memory_db().await;

        let mut console = scripted(&["1", "", "Herbert", "3"]);
        let err = add_book(&db, &mut console).await.unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));

        let mut console = scripted(&["1", "Dune", "Herbert", "-4"]);
        let err = add_book(&db, &mut console).await.unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));

        assert!(db.books().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_duplicate_book() {
        let db = db_with_dune().await;
        let mut console = scripted(&["1", "Emma", "Austen", "2"]);

        let err = add_book(&db, &mut console).await.unwrap_err();
        assert!(matches!(err, CliError::Db(DbError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_update_with_nothing_to_change() {
        let db = db_with_dune().await;
        let mut console = scripted(&["1", "", "", "-1"]);

        update_book(&db, &mut console).await.unwrap();

        assert!(output(console).ends_with("No changes requested.\n"));
        assert_eq!(
            db.books().get_by_id(1).await.unwrap(),
            Some(Book::new(1, "Dune", "Herbert", 3))
        );
    }

    #[tokio::test]
    async fn test_update_single_field() {
        let db = db_with_dune().await;
        let mut console = scripted(&["1", "", "", "7"]);

        update_book(&db, &mut console).await.unwrap();

        assert!(output(console).ends_with("Book updated.\n"));
        assert_eq!(
            db.books().get_by_id(1).await.unwrap(),
            Some(Book::new(1, "Dune", "Herbert", 7))
        );
    }

    #[tokio::test]
    async fn test_update_missing_book() {
        let db = db_with_dune().await;
        let mut console = scripted(&["9", "Emma", "", "-1"]);

        let err = update_book(&db, &mut console).await.unwrap_err();
        assert!(matches!(err, CliError::Db(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_book() {
        let db = db_with_dune().await;

        let mut console = scripted(&["1"]);
        delete_book(&db, &mut console).await.unwrap();
        assert!(output(console).ends_with("Book deleted.\n"));

        let mut console = scripted(&["1"]);
        delete_book(&db, &mut console).await.unwrap();
        assert!(output(console).ends_with("No book with ID 1.\n"));
    }
}
