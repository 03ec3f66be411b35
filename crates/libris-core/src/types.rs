//! # Domain Types
//!
//! Core domain types used throughout Libris.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │      Book       │   │      User       │   │    Transaction      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  book_id (PK)   │   │  user_id (PK)   │   │  transaction_id(PK) │   │
//! │  │  title          │   │  name           │   │  user_id (FK)       │   │
//! │  │  author         │   │  contact_info   │   │  book_id (FK)       │   │
//! │  │  copies         │   └─────────────────┘   │  issue_date         │   │
//! │  └─────────────────┘                         │  return_date (NULL) │   │
//! │                                              │  status             │   │
//! │  ┌─────────────────┐   ┌─────────────────┐   └─────────────────────┘   │
//! │  │   BookPatch     │   │TransactionStatus│                             │
//! │  │  title?         │   │  Issued         │                             │
//! │  │  author?        │   │  Returned       │                             │
//! │  │  copies?        │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by an operator-chosen integer id. Ids are never
//! generated by the program.

use std::fmt;

use chrono::NaiveDate;

use crate::KEEP_COPIES;

// =============================================================================
// Book
// =============================================================================

/// A title held by the library.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    /// Primary key.
    pub book_id: i64,

    /// Book title.
    pub title: String,

    /// Author name.
    pub author: String,

    /// Copies on the shelf.
    ///
    /// Issuing and returning do not change this count.
    pub available_copies: i64,
}

impl Book {
    /// Creates a new book.
    pub fn new(
        book_id: i64,
        title: impl Into<String>,
        author: impl Into<String>,
        available_copies: i64,
    ) -> Self {
        Book {
            book_id,
            title: title.into(),
            author: author.into(),
            available_copies,
        }
    }
}

// =============================================================================
// Book Patch
// =============================================================================

/// A partial update to a book. `None` means "keep the current value".
///
/// ## Prompt Conventions
/// ```text
/// New Title   : ""         → title = None      (keep)
/// New Author  : "Herbert"  → author = Some(..) (change)
/// New Copies  : -1         → copies = None     (keep)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub available_copies: Option<i64>,
}

impl BookPatch {
    /// Builds a patch from raw prompt answers.
    ///
    /// Empty text keeps the current value, as does [`KEEP_COPIES`].
    pub fn from_prompts(title: &str, author: &str, available_copies: i64) -> Self {
        let keep_if_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        BookPatch {
            title: keep_if_empty(title),
            author: keep_if_empty(author),
            available_copies: (available_copies != KEEP_COPIES).then_some(available_copies),
        }
    }

    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.changed_fields() == 0
    }

    /// Number of columns this patch changes.
    pub fn changed_fields(&self) -> usize {
        usize::from(self.title.is_some())
            + usize::from(self.author.is_some())
            + usize::from(self.available_copies.is_some())
    }
}

// =============================================================================
// User
// =============================================================================

/// A library member.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub contact_info: String,
}

impl User {
    /// Creates a new user.
    pub fn new(user_id: i64, name: impl Into<String>, contact_info: impl Into<String>) -> Self {
        User {
            user_id,
            name: name.into(),
            contact_info: contact_info.into(),
        }
    }
}

// =============================================================================
// Transaction Status
// =============================================================================

/// Circulation state of a transaction.
///
/// Stored as the text `Issued` / `Returned`. Transitions are not guarded:
/// returning an already returned transaction simply overwrites its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "PascalCase"))]
pub enum TransactionStatus {
    /// The book is out with the user.
    Issued,
    /// The book came back.
    Returned,
}

impl TransactionStatus {
    /// Returns the stored text form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Issued => "Issued",
            TransactionStatus::Returned => "Returned",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A loan of one book to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub transaction_id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub issue_date: NaiveDate,

    /// `None` until the book is returned.
    pub return_date: Option<NaiveDate>,

    pub status: TransactionStatus,
}

/// Input for issuing a book.
///
/// The new transaction always starts with no return date and status
/// [`TransactionStatus::Issued`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub transaction_id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub issue_date: NaiveDate,
}

impl NewIssue {
    /// Returns the transaction this issue creates.
    pub fn into_transaction(self) -> Transaction {
        Transaction {
            transaction_id: self.transaction_id,
            user_id: self.user_id,
            book_id: self.book_id,
            issue_date: self.issue_date,
            return_date: None,
            status: TransactionStatus::Issued,
        }
    }
}
