//! # Repository Module
//!
//! Database repository implementations for Libris.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Command Handler                                                       │
//! │       │                                                                 │
//! │       │  db.books().update(1, &patch)                                  │
//! │       ▼                                                                 │
//! │  BookRepository                                                        │
//! │  ├── builds a Statement (SQL + bound values)                           │
//! │  ├── executor::execute  ──► ExecOutcome / DbError                      │
//! │  └── query::fetch_rows  ──► stream of ResultRow                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BookRepository`](book::BookRepository) - Book CRUD and listing
//! - [`UserRepository`](user::UserRepository) - User CRUD
//! - [`TransactionRepository`](transaction::TransactionRepository) - Issue, return, listing

pub mod book;
pub mod transaction;
pub mod user;
