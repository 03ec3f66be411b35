//! # libris-core: Pure Domain Logic for Libris
//!
//! Domain types and input rules for the library console, with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Libris Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    libris-cli (Console)                         │   │
//! │  │    Menu ──► Prompts ──► Command Handlers ──► Tables            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ libris-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   text    │  │ validation│                  │   │
//! │  │   │   Book    │  │  bounded  │  │   rules   │                  │   │
//! │  │   │   User    │  │ truncate  │  │   dates   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CONSOLE • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    libris-db (Database Layer)                   │   │
//! │  │       session, schema, executor, query reader, repositories     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, User, Transaction, BookPatch)
//! - [`error`] - Domain error types
//! - [`validation`] - Input rules for ids, text fields and dates
//! - [`text`] - Bounded text with a visible truncation marker
//!
//! ## Example Usage
//!
//! ```rust
//! use libris_core::validation::parse_date;
//! use libris_core::text::bounded;
//!
//! let issued = parse_date("issue_date", "2024-01-01").unwrap();
//! assert_eq!(issued.to_string(), "2024-01-01");
//!
//! assert_eq!(bounded("Herbert", 4), "Her…");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod text;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of free-text fields (title, author, name, contact info).
///
/// Matches the width of the text columns the schema was designed around.
pub const MAX_TEXT_LEN: usize = 256;

/// Maximum length of a stored transaction status.
pub const MAX_STATUS_LEN: usize = 50;

/// Capacity reserved for a rendered date column.
pub const MAX_DATE_LEN: usize = 20;

/// Date format accepted on input and stored in the database.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sentinel entered at the copies prompt to keep the current value.
pub const KEEP_COPIES: i64 = -1;
