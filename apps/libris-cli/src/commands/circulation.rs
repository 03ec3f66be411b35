//! # Circulation Commands
//!
//! Menu entries 6-7. Neither touches a book's copy count.

use std::io::{BufRead, Write};

use libris_core::validation::validate_issue;
use libris_core::NewIssue;
use libris_db::Database;
use tracing::info;

use crate::console::Console;
use crate::error::CliResult;

/// Prompts for a loan and records it as issued.
pub async fn issue_book<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let transaction_id = console.prompt_int("Enter Transaction ID: ", "transaction_id")?;
    let user_id = console.prompt_int("Enter User ID: ", "user_id")?;
    let book_id = console.prompt_int("Enter Book ID: ", "book_id")?;
    let issue_date = console.prompt_date("Enter Issue Date (YYYY-MM-DD): ", "issue_date")?;

    let issue = NewIssue {
        transaction_id,
        user_id,
        book_id,
        issue_date,
    };
    validate_issue(&issue)?;

    db.transactions().issue(&issue).await?;
    info!(transaction_id, user_id, book_id, "Book issued");
    console.say("Book issued.")
}

/// Prompts for a transaction and its return date.
pub async fn return_book<R: BufRead, W: Write>(
    db: &Database,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let transaction_id = console.prompt_int("Enter Transaction ID: ", "transaction_id")?;
    let return_date = console.prompt_date("Enter Return Date (YYYY-MM-DD): ", "return_date")?;

    if db.transactions().mark_returned(transaction_id, return_date).await? {
        info!(transaction_id, %return_date, "Book returned");
        console.say("Book returned.")
    } else {
        console.say(format!("No transaction with ID {transaction_id}."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{memory_db, output, scripted};
    use crate::error::CliError;
    use chrono::NaiveDate;
    use libris_core::{Book, TransactionStatus, User};
    use libris_db::DbError;

    async fn setup() -> Database {
        let db = memory_db().await;
        db.books().insert(&Book::new(1, "Dune", "Herbert", 3)).await.unwrap();
        db.users().insert(&User::new(1, "Alice", "alice@x.com")).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_issue_then_return() {
        let db = setup().await;

        let mut console = scripted(&["100", "1", "1", "2024-01-01"]);
        issue_book(&db, &mut console).await.unwrap();
        assert!(output(console).ends_with("Book issued.\n"));

        let mut console = scripted(&["100", "2024-01-10"]);
        return_book(&db, &mut console).await.unwrap();
        assert!(output(console).ends_with("Book returned.\n"));

        let tx = db.transactions().get_by_id(100).await.unwrap().unwrap();
        assert_eq!(tx.status, TransactionStatus::Returned);
        assert_eq!(tx.return_date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(db.books().get_by_id(1).await.unwrap().unwrap().available_copies, 3);
    }

    #[tokio::test]
    async fn test_issue_rejects_bad_date() {
        let db = setup().await;
        let mut console = scripted(&["100", "1", "1", "01/01/2024"]);

        let err = issue_book(&db, &mut console).await.unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[tokio::test]
    async fn test_issue_to_unknown_user() {
        let db = setup().await;
        let mut console = scripted(&["100", "42", "1", "2024-01-01"]);

        let err = issue_book(&db, &mut console).await.unwrap_err();
        assert!(matches!(err, CliError::Db(DbError::ForeignKeyViolation { .. })));
    }

    #[tokio::test]
    async fn test_return_unknown_transaction() {
        let db = setup().await;
        let mut console = scripted(&["555", "2024-01-10"]);

        return_book(&db, &mut console).await.unwrap();
        assert!(output(console).ends_with("No transaction with ID 555.\n"));
    }
}
