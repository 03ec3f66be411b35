//! # Console I/O
//!
//! Prompts and line reading over any `BufRead` / `Write` pair, so the menu
//! runs the same against stdin/stdout and against scripted test input.

use std::fmt::Display;
use std::io::{BufRead, Write};

use chrono::NaiveDate;
use libris_core::validation::{parse_date, parse_int};

use crate::error::{CliError, CliResult};

/// Line-oriented console.
pub struct Console<R, W> {
    input: R,
    output: W,
    line: String,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console {
            input,
            output,
            line: String::new(),
        }
    }

    /// Shows `label` and reads one line, without its line terminator.
    ///
    /// ## Returns
    /// * `Ok(line)` - The answer (may be empty)
    /// * `Err(CliError::EndOfInput)` - Input closed before a line arrived
    pub fn prompt(&mut self, label: &str) -> CliResult<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        self.line.clear();
        if self.input.read_line(&mut self.line)? == 0 {
            return Err(CliError::EndOfInput);
        }

        Ok(self.line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Reads a whole-line integer.
    pub fn prompt_int(&mut self, label: &str, field: &str) -> CliResult<i64> {
        let raw = self.prompt(label)?;
        Ok(parse_int(field, &raw)?)
    }

    /// Reads a `YYYY-MM-DD` date.
    pub fn prompt_date(&mut self, label: &str, field: &str) -> CliResult<NaiveDate> {
        let raw = self.prompt(label)?;
        Ok(parse_date(field, &raw)?)
    }

    /// Writes one line.
    pub fn say(&mut self, message: impl Display) -> CliResult<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Direct access to the output, for tables.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_prompt_reads_whole_lines() {
        let mut c = console("Dune Messiah\r\n\nlast");
        assert_eq!(c.prompt("Title: ").unwrap(), "Dune Messiah");
        assert_eq!(c.prompt("Title: ").unwrap(), "");
        assert_eq!(c.prompt("Title: ").unwrap(), "last");
        assert!(matches!(c.prompt("Title: "), Err(CliError::EndOfInput)));

        let out = String::from_utf8(c.into_output()).unwrap();
        assert_eq!(out, "Title: Title: Title: Title: ");
    }

    #[test]
    fn test_prompt_int() {
        let mut c = console(" 42 \n-1\nlots\n");
        assert_eq!(c.prompt_int("Copies: ", "available_copies").unwrap(), 42);
        assert_eq!(c.prompt_int("Copies: ", "available_copies").unwrap(), -1);
        assert!(matches!(
            c.prompt_int("Copies: ", "available_copies"),
            Err(CliError::Validation(_))
        ));
    }

    #[test]
    fn test_prompt_date() {
        let mut c = console("2024-01-10\n2024/01/10\n");
        assert_eq!(
            c.prompt_date("Date: ", "return_date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
        assert!(c.prompt_date("Date: ", "return_date").is_err());
    }
}
