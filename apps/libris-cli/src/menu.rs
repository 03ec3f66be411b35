//! # Menu Dispatcher
//!
//! Shows the numbered menu, reads a choice and runs its handler until the
//! operator picks Exit or input runs out.
//!
//! ## Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  print menu ──► read choice ──┬── 1..9  ──► handler ──┬── ok ────────┐ │
//! │       ▲                       │                       └── Error: ... ┤ │
//! │       │                       ├── 10 / EOF ──► "Goodbye", return     │ │
//! │       │                       └── other ──► "Invalid choice" ────────┤ │
//! │       └──────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{BufRead, Write};

use libris_db::Database;
use tracing::{debug, warn};

use crate::commands;
use crate::console::Console;
use crate::error::{CliError, CliResult};

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddBook,
    UpdateBook,
    DeleteBook,
    AddUser,
    DeleteUser,
    IssueBook,
    ReturnBook,
    DisplayBooks,
    DisplayTransactions,
    Exit,
}

impl MenuChoice {
    /// All entries in menu order.
    pub const ALL: [MenuChoice; 10] = [
        MenuChoice::AddBook,
        MenuChoice::UpdateBook,
        MenuChoice::DeleteBook,
        MenuChoice::AddUser,
        MenuChoice::DeleteUser,
        MenuChoice::IssueBook,
        MenuChoice::ReturnBook,
        MenuChoice::DisplayBooks,
        MenuChoice::DisplayTransactions,
        MenuChoice::Exit,
    ];

    /// Parses a typed choice, `"1"` through `"10"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let number: usize = raw.trim().parse().ok()?;
        number
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index))
            .copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::AddBook => "Add Book",
            MenuChoice::UpdateBook => "Update Book",
            MenuChoice::DeleteBook => "Delete Book",
            MenuChoice::AddUser => "Add User",
            MenuChoice::DeleteUser => "Delete User",
            MenuChoice::IssueBook => "Issue Book",
            MenuChoice::ReturnBook => "Return Book",
            MenuChoice::DisplayBooks => "Display Books",
            MenuChoice::DisplayTransactions => "Display Transactions",
            MenuChoice::Exit => "Exit",
        }
    }
}

fn write_menu<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Library Management System Menu:")?;
    for (number, choice) in (1..).zip(MenuChoice::ALL) {
        writeln!(out, "{number}. {}", choice.label())?;
    }
    Ok(())
}

/// Runs the menu loop on an open session.
///
/// Handler failures are printed as `Error: <message>` and the loop goes on.
/// Only console I/O failures end the session early.
pub async fn run_session<R, W>(db: &Database, console: &mut Console<R, W>) -> CliResult<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        write_menu(console.output())?;

        let raw = match console.prompt("Enter your choice: ") {
            Ok(raw) => raw,
            Err(CliError::EndOfInput) => break,
            Err(e) => return Err(e),
        };

        let Some(choice) = MenuChoice::parse(&raw) else {
            console.say("Invalid choice. Please try again.")?;
            continue;
        };

        if choice == MenuChoice::Exit {
            break;
        }

        debug!(?choice, "Running command");
        match commands::dispatch(choice, db, console).await {
            Ok(()) => {}
            Err(CliError::EndOfInput) => break,
            Err(e) if e.is_recoverable() => {
                warn!(?choice, error = %e, "Command failed");
                console.say(format!("Error: {e}"))?;
            }
            Err(e) => return Err(e),
        }
    }

    console.say("Exiting program. Goodbye!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{memory_db, output, scripted, token_lines};

    #[test]
    fn test_parse_choices() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::AddBook));
        assert_eq!(MenuChoice::parse(" 9 "), Some(MenuChoice::DisplayTransactions));
        assert_eq!(MenuChoice::parse("10"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("11"), None);
        assert_eq!(MenuChoice::parse("-1"), None);
        assert_eq!(MenuChoice::parse("add"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn test_menu_text() {
        let mut out = Vec::new();
        write_menu(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Library Management System Menu:\n1. Add Book\n"));
        assert!(text.ends_with("9. Display Transactions\n10. Exit\n"));
    }

    #[tokio::test]
    async fn test_exit_immediately() {
        let db = memory_db().await;
        let mut console = scripted(&["10"]);

        run_session(&db, &mut console).await.unwrap();

        let text = output(console);
        assert!(text.ends_with("Enter your choice: Exiting program. Goodbye!\n"));
        assert_eq!(text.matches("Library Management System Menu:").count(), 1);
    }

    #[tokio::test]
    async fn test_end_of_input_exits() {
        let db = memory_db().await;
        let mut console = scripted(&["8"]);

        run_session(&db, &mut console).await.unwrap();
        assert!(output(console).ends_with("Exiting program. Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_invalid_choice_shows_menu_again() {
        let db = memory_db().await;
        let mut console = scripted(&["42", "abc", "10"]);

        run_session(&db, &mut console).await.unwrap();

        let text = output(console);
        assert_eq!(text.matches("Invalid choice. Please try again.").count(), 2);
        assert_eq!(text.matches("Library Management System Menu:").count(), 3);
    }

    #[tokio::test]
    async fn test_errors_do_not_end_the_session() {
        let db = memory_db().await;
        let mut console = scripted(&[
            "1", "1", "Dune", "Herbert", "3", // add
            "1", "1", "Dune", "Herbert", "3", // duplicate
            "1", "x",                          // bad id
            "8", "10",
        ]);

        run_session(&db, &mut console).await.unwrap();

        let text = output(console);
        assert_eq!(text.matches("Book added.").count(), 1);
        assert!(text.contains("Error: Duplicate Books.book_id: already exists"));
        assert!(text.contains("Error: book_id "));
        assert!(text.contains("Books in the Library:"));
    }

    #[tokio::test]
    async fn test_library_scenario() {
        let db = memory_db().await;
        let mut console = scripted(&[
            "1", "1", "Dune", "Herbert", "3",
            "8",
            "4", "1", "Alice", "alice@x.com",
            "6", "100", "1", "1", "2024-01-01",
            "9",
            "7", "100", "2024-01-10",
            "9",
            "10",
        ]);

        run_session(&db, &mut console).await.unwrap();

        let text = output(console);
        let lines = token_lines(&text);

        let dune_row: Vec<String> = ["1", "Dune", "Herbert", "3"].map(String::from).to_vec();
        assert!(lines.contains(&dune_row));
        for message in ["Book added.", "User added.", "Book issued.", "Book returned."] {
            assert!(text.contains(message), "missing {message}");
        }

        let transaction_rows: Vec<&Vec<String>> = lines
            .iter()
            .filter(|l| l.first().map(String::as_str) == Some("100"))
            .collect();
        assert_eq!(transaction_rows.len(), 2);
        assert_eq!(transaction_rows[0], &["100", "1", "1", "2024-01-01", "Issued"]);
        assert_eq!(
            transaction_rows[1],
            &["100", "1", "1", "2024-01-01", "2024-01-10", "Returned"]
        );
    }
}
