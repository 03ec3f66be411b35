//! # libris-db: Database Layer for Libris
//!
//! This crate provides database access for the Libris library console.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Libris Data Flow                                 │
//! │                                                                         │
//! │  Command Handler (update book)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    libris-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────┐  ┌──────────────┐  ┌──────────┐  ┌──────────┐  │   │
//! │  │  │  Database  │  │ Repositories │  │ executor │  │  schema  │  │   │
//! │  │  │(session.rs)│  │  book.rs     │  │ query    │  │ 3 tables │  │   │
//! │  │  │            │  │  user.rs     │  │          │  │          │  │   │
//! │  │  │ 1 conn     │◄─│  transaction │─►│ Statement│  │ IF NOT   │  │   │
//! │  │  │            │  │              │  │ ResultRow│  │ EXISTS   │  │   │
//! │  │  └────────────┘  └──────────────┘  └──────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/libris/libris.db  (or :memory:)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`session`] - Opening and closing the single connection
//! - [`schema`] - Creating the Books, Users and Transactions tables
//! - [`executor`] - Parameterized non-query statements
//! - [`query`] - Lazy, positional row reading
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (book, user, transaction)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use libris_db::{Database, DbConfig};
//!
//! let db = Database::connect(DbConfig::new("libris.db")).await?;
//!
//! db.books().insert(&Book::new(1, "Dune", "Herbert", 3)).await?;
//! let books = db.books().list().await?;
//!
//! db.disconnect().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod executor;
pub mod query;
pub mod repository;
pub mod schema;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use executor::{ExecOutcome, SqlValue, Statement};
pub use query::{Cell, ColumnDef, ColumnKind, ResultRow, BOOK_COLUMNS, TRANSACTION_COLUMNS};
pub use session::{Database, DbConfig, IN_MEMORY_PATH};

// Repository re-exports for convenience
pub use repository::book::{BookRepository, UpdateOutcome};
pub use repository::transaction::TransactionRepository;
pub use repository::user::UserRepository;
