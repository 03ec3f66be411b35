//! # Table Display
//!
//! Fixed-width, left-aligned tables for the two listing commands.
//!
//! ## Layout
//! ```text
//! Books in the Library:
//! Book ID   Title                         Author                        Available Copies
//! 1         Dune                          Herbert                       3
//! ```
//!
//! A cell never fills its column: anything longer than `width - 1`
//! characters is cut with `…`, so neighbouring columns stay separated.

use std::io::{self, Write};

use libris_core::text::bounded;
use libris_db::ResultRow;

/// One display column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub width: usize,
}

const fn col(header: &'static str, width: usize) -> Column {
    Column { header, width }
}

/// Caption plus columns.
#[derive(Debug, Clone, Copy)]
pub struct TableLayout {
    pub caption: &'static str,
    pub columns: &'static [Column],
}

pub const BOOK_TABLE: TableLayout = TableLayout {
    caption: "Books in the Library:",
    columns: &[
        col("Book ID", 10),
        col("Title", 30),
        col("Author", 30),
        col("Available Copies", 20),
    ],
};

pub const TRANSACTION_TABLE: TableLayout = TableLayout {
    caption: "Transactions in the Library:",
    columns: &[
        col("Transaction ID", 15),
        col("User ID", 10),
        col("Book ID", 10),
        col("Issue Date", 15),
        col("Return Date", 15),
        col("Status", 30),
    ],
};

impl TableLayout {
    /// Writes the caption and the header line.
    pub fn write_header<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.caption)?;
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        self.write_cells(out, &headers)
    }

    /// Writes one data row; NULL cells come out blank.
    pub fn write_row<W: Write>(&self, out: &mut W, row: &ResultRow) -> io::Result<()> {
        let cells: Vec<String> = row.cells().iter().map(ToString::to_string).collect();
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        self.write_cells(out, &cells)
    }

    fn write_cells<W: Write>(&self, out: &mut W, cells: &[&str]) -> io::Result<()> {
        let mut line = String::new();
        for (column, cell) in self.columns.iter().zip(cells) {
            let text = bounded(cell, column.width.saturating_sub(1));
            line.push_str(&format!("{:<width$}", text, width = column.width));
        }
        writeln!(out, "{}", line.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_alignment() {
        let text = render(|out| BOOK_TABLE.write_header(out));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Books in the Library:");
        assert!(lines[1].starts_with("Book ID   Title"));
        assert_eq!(lines[1].find("Author"), Some(40));
        assert_eq!(lines[1].find("Available Copies"), Some(70));
    }

    #[test]
    fn test_long_cells_are_cut() {
        let long_title = "A".repeat(40);
        let text = render(|out| BOOK_TABLE.write_cells(out, &["1", long_title.as_str(), "Herbert", "3"]));

        let expected_title = format!("{}… ", "A".repeat(28));
        assert!(text.contains(&expected_title));
        assert_eq!(text.chars().position(|c| c == 'H'), Some(40));
    }

    #[test]
    fn test_transaction_header() {
        let text = render(|out| TRANSACTION_TABLE.write_header(out));
        let header = text.lines().nth(1).unwrap();
        assert!(header.starts_with("Transaction ID User ID   Book ID   Issue Date"));
        assert!(header.ends_with("Status"));
    }
}
