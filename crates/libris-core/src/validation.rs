//! # Validation Module
//!
//! Input validation for Libris.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console (libris-cli)                                         │
//! │  ├── Parse integers and dates from typed lines                         │
//! │  └── Re-show the menu on bad input                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Ids positive, copies non-negative                                 │
//! │  └── Text present and within column bounds                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── PRIMARY KEY uniqueness                                            │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{Book, BookPatch, NewIssue, User};
use crate::{DATE_FORMAT, MAX_TEXT_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest accepted copy count.
pub const MAX_COPIES: i64 = 1_000_000;

// =============================================================================
// Parsers
// =============================================================================

/// Parses a whole-line integer answer.
///
/// ## Example
/// ```rust
/// use libris_core::validation::parse_int;
///
/// assert_eq!(parse_int("book_id", " 42 ").unwrap(), 42);
/// assert!(parse_int("book_id", "forty-two").is_err());
/// ```
pub fn parse_int(field: &str, raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    raw.parse::<i64>()
        .map_err(|e| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: e.to_string(),
        })
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("expected YYYY-MM-DD ({e})"),
    })
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a primary or foreign key.
///
/// ## Rules
/// - Must be at least 1
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id < 1 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a copy count.
pub fn validate_copies(copies: i64) -> ValidationResult<()> {
    if !(0..=MAX_COPIES).contains(&copies) {
        return Err(ValidationError::OutOfRange {
            field: "available_copies".to_string(),
            min: 0,
            max: MAX_COPIES,
        });
    }
    Ok(())
}

/// Validates a free-text field against [`MAX_TEXT_LEN`].
///
/// ## Rules
/// - Required fields must not be blank
/// - At most 256 characters
pub fn validate_text(field: &str, value: &str, required: bool) -> ValidationResult<()> {
    if required && value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a book before insert.
pub fn validate_book(book: &Book) -> ValidationResult<()> {
    validate_id("book_id", book.book_id)?;
    validate_text("title", &book.title, true)?;
    validate_text("author", &book.author, true)?;
    validate_copies(book.available_copies)
}

/// Validates the fields a patch changes.
pub fn validate_patch(patch: &BookPatch) -> ValidationResult<()> {
    if let Some(title) = &patch.title {
        validate_text("title", title, true)?;
    }
    if let Some(author) = &patch.author {
        validate_text("author", author, true)?;
    }
    if let Some(copies) = patch.available_copies {
        validate_copies(copies)?;
    }
    Ok(())
}

/// Validates a user before insert. Contact info may be blank.
pub fn validate_user(user: &User) -> ValidationResult<()> {
    validate_id("user_id", user.user_id)?;
    validate_text("name", &user.name, true)?;
    validate_text("contact_info", &user.contact_info, false)
}

/// Validates the ids of a new issue.
pub fn validate_issue(issue: &NewIssue) -> ValidationResult<()> {
    validate_id("transaction_id", issue.transaction_id)?;
    validate_id("user_id", issue.user_id)?;
    validate_id("book_id", issue.book_id)
}
