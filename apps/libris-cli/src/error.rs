//! # Console Error Type
//!
//! Unified error type for command handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Command Handler                                                       │
//! │  Result<(), CliError>                                                  │
//! │         │                                                               │
//! │         ├── Validation error? ── ValidationError ──┐                   │
//! │         ├── Database error?  ─── DbError ──────────┤                   │
//! │         │                                          ▼                   │
//! │         │                             "Error: <message>" printed,      │
//! │         │                             menu shown again                 │
//! │         │                                                               │
//! │         ├── Input closed? ─── EndOfInput ──► session ends normally     │
//! │         └── Console broken? ─ Io ──────────► session aborts            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use libris_core::ValidationError;
use libris_db::DbError;
use thiserror::Error;

use crate::config::ConfigError;

/// Error returned by console operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// A repository call failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// An answer was rejected before reaching the database.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Reading stdin or writing stdout failed.
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Input closed while a prompt was waiting.
    #[error("End of input")]
    EndOfInput,

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CliError {
    /// Returns true if the menu loop can keep going after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CliError::Db(_) | CliError::Validation(_))
    }
}

/// Result type for console operations.
pub type CliResult<T> = Result<T, CliError>;
