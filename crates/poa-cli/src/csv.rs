//! Minimal CSV reading and writing.
//!
//! The event logs this tool consumes are plain comma-separated exports;
//! fields containing commas, quotes, or newlines are double-quoted with
//! `""` escaping. No repo dependency covers this, so the handful of
//! rules lives here.

use std::borrow::Cow;
use std::io::{self, Write};

/// Parses CSV text into records.
///
/// Handles quoted fields, escaped quotes (`""`), embedded newlines, and
/// both `\n` and `\r\n` terminators. A trailing newline does not
/// produce an empty record.
#[must_use]
pub fn parse(input: &str) -> Vec<Vec<String>> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}

/// Quotes a field when it contains a comma, quote, or line break.
fn escape(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Writes one CSV record.
pub fn write_record<W: Write, S: AsRef<str>>(writer: &mut W, cells: &[S]) -> io::Result<()> {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        writer.write_all(escape(cell.as_ref()).as_bytes())?;
    }
    writer.write_all(b"\n")
}
