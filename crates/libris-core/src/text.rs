//! # Bounded Text
//!
//! Text columns have a maximum length. Instead of cutting bytes silently,
//! overlong values are shortened on a character boundary and end with a
//! visible marker so the reader can tell the value was clipped.

use std::borrow::Cow;

/// Marker appended to a value that was shortened.
pub const TRUNCATION_MARKER: char = '…';

/// Returns `value` limited to `max_chars` characters.
///
/// Values that fit are borrowed unchanged. Longer values keep the first
/// `max_chars - 1` characters followed by [`TRUNCATION_MARKER`].
///
/// ## Example
/// ```rust
/// use libris_core::text::bounded;
///
/// assert_eq!(bounded("Dune", 10), "Dune");
/// assert_eq!(bounded("Children of Dune", 8), "Childre…");
/// ```
pub fn bounded(value: &str, max_chars: usize) -> Cow<'_, str> {
    if value.chars().count() <= max_chars {
        return Cow::Borrowed(value);
    }

    if max_chars == 0 {
        return Cow::Owned(String::new());
    }

    let mut clipped: String = value.chars().take(max_chars - 1).collect();
    clipped.push(TRUNCATION_MARKER);
    Cow::Owned(clipped)
}
