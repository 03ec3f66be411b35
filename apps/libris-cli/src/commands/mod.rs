//! # Command Handlers
//!
//! One handler per menu entry. Each reads its answers from the console,
//! validates them, calls a repository and reports the outcome.
//!
//! ## Handler Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  prompt(s) ──► libris_core::validation ──► db.<repo>().<op>() ──► say  │
//! │      │                   │                         │                    │
//! │      └── EndOfInput      └── CliError::Validation  └── CliError::Db    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Organization
//! - [`book`] - Add, update, delete books
//! - [`user`] - Add, delete users
//! - [`circulation`] - Issue and return books
//! - [`report`] - Book and transaction tables

pub mod book;
pub mod circulation;
pub mod report;
pub mod user;

use std::io::{BufRead, Write};

use libris_db::Database;

use crate::console::Console;
use crate::error::CliResult;
use crate::menu::MenuChoice;

/// Runs the handler for `choice`. `Exit` does nothing.
pub async fn dispatch<R, W>(
    choice: MenuChoice,
    db: &Database,
    console: &mut Console<R, W>,
) -> CliResult<()>
where
    R: BufRead,
    W: Write,
{
    match choice {
        MenuChoice::AddBook => book::add_book(db, console).await,
        MenuChoice::UpdateBook => book::update_book(db, console).await,
        MenuChoice::DeleteBook => book::delete_book(db, console).await,
        MenuChoice::AddUser => user::add_user(db, console).await,
        MenuChoice::DeleteUser => user::delete_user(db, console).await,
        MenuChoice::IssueBook => circulation::issue_book(db, console).await,
        MenuChoice::ReturnBook => circulation::return_book(db, console).await,
        MenuChoice::DisplayBooks => report::display_books(db, console).await,
        MenuChoice::DisplayTransactions => report::display_transactions(db, console).await,
        MenuChoice::Exit => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;

    use libris_db::{Database, DbConfig};

    use crate::console::Console;

    pub type TestConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

    pub async fn memory_db() -> Database {
        Database::connect(DbConfig::in_memory()).await.unwrap()
    }

    /// A console fed with one answer per line.
    pub fn scripted(answers: &[&str]) -> TestConsole {
        let mut input = answers.join("\n");
        input.push('\n');
        Console::new(Cursor::new(input.into_bytes()), Vec::new())
    }

    pub fn output(console: TestConsole) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    /// Whitespace-separated tokens of each line, for column-agnostic checks.
    pub fn token_lines(text: &str) -> Vec<Vec<String>> {
        text.lines()
            .map(|l| l.split_whitespace().map(str::to_string).collect())
            .collect()
    }
}
