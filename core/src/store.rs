//! Row store capability and addressing types.
//!
//! The backing store is a remote spreadsheet used as a row-oriented database.
//! It offers no transactions, no uniqueness constraints and no compare-and-swap,
//! and appended rows become visible eventually. Everything above this module
//! talks to it only through [`RowStore`].
//!
//! # Addressing
//!
//! A [`Table`] is a named sheet with a fixed number of columns. Row 0 of every
//! table is a header row and is never a data row. A [`Range`] is an A1-style
//! window onto a table (`Slots!A:C`, `Reservations!C:C`, `Slots!A1:C1`).
//!
//! # Implementations
//!
//! - `SheetsClient` (in `slot-booking-sheets`): Google Sheets v4 over HTTP
//! - `InMemoryRowStore` (in `slot-booking-testing`): fast, deterministic tests

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// One stored row: cells in column order, as text.
pub type Row = Vec<String>;

/// Boxed future returned by [`RowStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Errors reported by a row store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("Request failed: {0}")]
    Request(String),

    /// The store answered with a non-success status.
    #[error("Store returned status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The response could not be decoded.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// No sheet with the given title exists.
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),
}

/// Opaque identifier of a sheet inside the spreadsheet, needed for positional deletes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SheetId(pub i64);

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named sheet with a fixed column span starting at column `A`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Table {
    name: String,
    width: usize,
}

impl Table {
    /// Creates a table reference. `width` is clamped to at least one column.
    #[must_use]
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        Self {
            name: name.into(),
            width: width.max(1),
        }
    }

    /// Sheet title.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Every column, every row (`Name!A:C`).
    #[must_use]
    pub fn full_range(&self) -> Range {
        Range {
            sheet: self.name.clone(),
            first_column: 0,
            last_column: self.width - 1,
            rows: None,
        }
    }

    /// A single column, every row (`Name!C:C`).
    #[must_use]
    pub fn column(&self, index: usize) -> Range {
        Range {
            sheet: self.name.clone(),
            first_column: index,
            last_column: index,
            rows: None,
        }
    }

    /// The header row only (`Name!A1:C1`).
    #[must_use]
    pub fn header_range(&self) -> Range {
        Range {
            sheet: self.name.clone(),
            first_column: 0,
            last_column: self.width - 1,
            rows: Some((1, 1)),
        }
    }
}

/// An A1-notation window onto a sheet.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    sheet: String,
    first_column: usize,
    last_column: usize,
    /// 1-based inclusive row bounds; `None` means unbounded.
    rows: Option<(usize, usize)>,
}

impl Range {
    /// Sheet title.
    #[must_use]
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Zero-based first column.
    #[must_use]
    pub const fn first_column(&self) -> usize {
        self.first_column
    }

    /// Zero-based last column (inclusive).
    #[must_use]
    pub const fn last_column(&self) -> usize {
        self.last_column
    }

    /// 1-based inclusive row bounds, if the range is row-bounded.
    #[must_use]
    pub const fn rows(&self) -> Option<(usize, usize)> {
        self.rows
    }

    /// Renders the range in A1 notation.
    #[must_use]
    pub fn a1(&self) -> String {
        let first = column_letter(self.first_column);
        let last = column_letter(self.last_column);
        match self.rows {
            Some((top, bottom)) => format!("{}!{first}{top}:{last}{bottom}", self.sheet),
            None => format!("{}!{first}:{last}", self.sheet),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.a1())
    }
}

/// Converts a zero-based column index to its spreadsheet letter (`0 → A`, `26 → AA`).
#[must_use]
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26, so the cast cannot truncate
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// The capability surface of the remote tabular store.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures instead of `async fn` so the store can be
/// shared as `Arc<dyn RowStore>` and swapped for a fake in tests.
pub trait RowStore: Send + Sync {
    /// Reads every row of `range`, in storage order. Row 0 of a full-table
    /// read is the header. Trailing empty cells may be omitted.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the read fails.
    fn read_range(&self, range: Range) -> StoreFuture<'_, Vec<Row>>;

    /// Appends `rows` after the last non-empty row of `range`'s table.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    fn append_rows(&self, range: Range, rows: Vec<Row>) -> StoreFuture<'_, ()>;

    /// Writes `rows` starting at the top-left cell of `range`, replacing what is there.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    fn overwrite_range(&self, range: Range, rows: Vec<Row>) -> StoreFuture<'_, ()>;

    /// Resolves the internal identifier of the sheet titled `sheet`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SheetNotFound`] if no sheet has that title, or
    /// another [`StoreError`] if the metadata request fails.
    fn resolve_sheet_id(&self, sheet: String) -> StoreFuture<'_, SheetId>;

    /// Removes physical rows `[start, end)` (zero-based, header included) from a sheet.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the delete fails.
    fn delete_rows(&self, sheet_id: SheetId, start: usize, end: usize) -> StoreFuture<'_, ()>;
}

/// Parses a stored id cell into an integer.
///
/// Accepts plain integers and integral floats (`"1700000000000.0"`), which is
/// how a spreadsheet may render a large number.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub fn parse_id(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if let Ok(id) = cell.parse::<i64>() {
        return Some(id);
    }
    let float = cell.parse::<f64>().ok()?;
    // integral and below 2^53, so the cast is exact
    if float.is_finite() && float.fract() == 0.0 && float.abs() < 9.0e15 {
        Some(float as i64)
    } else {
        None
    }
}

/// Reads a cell, treating a missing trailing cell as empty.
#[must_use]
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(2), "C");
        assert_eq!(column_letter(12), "M");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }

    #[test]
    fn test_a1_ranges() {
        let table = Table::new("Slots", 3);
        assert_eq!(table.full_range().a1(), "Slots!A:C");
        assert_eq!(table.column(2).a1(), "Slots!C:C");
        assert_eq!(table.header_range().a1(), "Slots!A1:C1");
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("1700000000000"), Some(1_700_000_000_000));
        assert_eq!(parse_id(" 42 "), Some(42));
        assert_eq!(parse_id("1700000000000.0"), Some(1_700_000_000_000));
        assert_eq!(parse_id("12.5"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn test_cell_defaults_to_empty() {
        let row = vec!["a".to_string()];
        assert_eq!(cell(&row, 0), "a");
        assert_eq!(cell(&row, 5), "");
    }
}
