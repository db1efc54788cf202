//! In-memory row store for fast, deterministic tests.
//!
//! Behaves like the spreadsheet backend where it matters to callers:
//! - reads return rows in storage order, trailing empty cells and rows omitted
//! - appends land after the last non-empty row
//! - deletes are positional and shift later rows up
//!
//! Failures can be injected per operation and target, and every call can be
//! delayed to widen race windows in concurrency tests.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on a poisoned lock

use slot_booking_core::store::{Range, Row, RowStore, SheetId, StoreError, StoreFuture};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Store operations, used to target injected failures and count calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `read_range`
    Read,
    /// `append_rows`
    Append,
    /// `overwrite_range`
    Overwrite,
    /// `resolve_sheet_id`
    ResolveSheet,
    /// `delete_rows`
    DeleteRows,
}

#[derive(Clone, Debug)]
struct Failure {
    operation: Operation,
    target: String,
    error: StoreError,
}

impl Failure {
    fn matches(&self, operation: Operation, sheet: &str, a1: &str) -> bool {
        self.operation == operation
            && (self.target == "*" || self.target == sheet || self.target == a1)
    }
}

#[derive(Clone, Debug)]
struct SheetData {
    sheet_id: SheetId,
    rows: Vec<Row>,
}

/// In-memory spreadsheet.
///
/// # Example
///
/// ```
/// use slot_booking_testing::InMemoryRowStore;
/// use slot_booking_core::store::{RowStore, Table};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryRowStore::new().with_table("Slots", vec![vec!["ID".into()]]);
/// let rows = store.read_range(Table::new("Slots", 3).full_range()).await?;
/// assert_eq!(rows.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryRowStore {
    sheets: Arc<RwLock<HashMap<String, SheetData>>>,
    failures: Arc<RwLock<Vec<Failure>>>,
    calls: Arc<RwLock<HashMap<Operation, usize>>>,
    latency: Option<Duration>,
}

impl InMemoryRowStore {
    /// Creates a store with no sheets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet holding `rows`.
    #[must_use]
    pub fn with_table(self, name: &str, rows: Vec<Row>) -> Self {
        self.seed(name, rows);
        self
    }

    /// Adds a sheet whose only row is `header`.
    #[must_use]
    pub fn with_header(self, name: &str, header: &[&str]) -> Self {
        self.with_table(name, vec![header.iter().map(ToString::to_string).collect()])
    }

    /// Delays every operation by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replaces (or creates) a sheet's rows.
    pub fn seed(&self, name: &str, rows: Vec<Row>) {
        let mut sheets = self.sheets.write().unwrap();
        let next_id = i64::try_from(sheets.len()).unwrap() * 1000 + 7;
        sheets
            .entry(name.to_string())
            .and_modify(|sheet| sheet.rows.clone_from(&rows))
            .or_insert(SheetData {
                sheet_id: SheetId(next_id),
                rows,
            });
    }

    /// Current rows of a sheet, exactly as stored (empty if it does not exist).
    #[must_use]
    pub fn rows(&self, name: &str) -> Vec<Row> {
        self.sheets
            .read()
            .unwrap()
            .get(name)
            .map(|sheet| sheet.rows.clone())
            .unwrap_or_default()
    }

    /// Makes `operation` fail with `error` whenever its target matches.
    ///
    /// `target` is a sheet name, an exact A1 range (`Reservations!C:C`) or `*`.
    pub fn fail(&self, operation: Operation, target: &str, error: StoreError) {
        self.failures.write().unwrap().push(Failure {
            operation,
            target: target.to_string(),
            error,
        });
    }

    /// Removes every injected failure.
    pub fn clear_failures(&self) {
        self.failures.write().unwrap().clear();
    }

    /// Number of times `operation` was called.
    #[must_use]
    pub fn calls(&self, operation: Operation) -> usize {
        self.calls
            .read()
            .unwrap()
            .get(&operation)
            .copied()
            .unwrap_or(0)
    }

    async fn enter(&self, operation: Operation, sheet: &str, a1: &str) -> Result<(), StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        *self.calls.write().unwrap().entry(operation).or_default() += 1;
        let failures = self.failures.read().unwrap();
        match failures.iter().find(|f| f.matches(operation, sheet, a1)) {
            Some(failure) => Err(failure.error.clone()),
            None => Ok(()),
        }
    }

    fn unknown_range(a1: &str) -> StoreError {
        StoreError::Status {
            status: 400,
            message: format!("Unable to parse range: {a1}"),
        }
    }

    fn read_now(&self, range: &Range) -> Result<Vec<Row>, StoreError> {
        let sheets = self.sheets.read().unwrap();
        let sheet = sheets
            .get(range.sheet())
            .ok_or_else(|| Self::unknown_range(&range.a1()))?;

        let (start, end) = range
            .rows()
            .map_or((0, sheet.rows.len()), |(first, last)| {
                (first.saturating_sub(1), last.min(sheet.rows.len()))
            });

        let mut rows: Vec<Row> = sheet
            .rows
            .get(start..end.max(start))
            .unwrap_or_default()
            .iter()
            .map(|row| {
                let mut cells: Row = (range.first_column()..=range.last_column())
                    .map(|column| row.get(column).cloned().unwrap_or_default())
                    .collect();
                while cells.last().is_some_and(String::is_empty) {
                    cells.pop();
                }
                cells
            })
            .collect();
        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }
        Ok(rows)
    }

    fn append_now(&self, range: &Range, rows: Vec<Row>) -> Result<(), StoreError> {
        let mut sheets = self.sheets.write().unwrap();
        let sheet = sheets
            .get_mut(range.sheet())
            .ok_or_else(|| Self::unknown_range(&range.a1()))?;
        while sheet
            .rows
            .last()
            .is_some_and(|row| row.iter().all(String::is_empty))
        {
            sheet.rows.pop();
        }
        sheet.rows.extend(rows);
        Ok(())
    }

    fn overwrite_now(&self, range: &Range, rows: Vec<Row>) -> Result<(), StoreError> {
        let mut sheets = self.sheets.write().unwrap();
        let sheet = sheets
            .get_mut(range.sheet())
            .ok_or_else(|| Self::unknown_range(&range.a1()))?;
        let first_row = range.rows().map_or(0, |(first, _)| first.saturating_sub(1));
        for (offset, row) in rows.into_iter().enumerate() {
            let index = first_row + offset;
            if sheet.rows.len() <= index {
                sheet.rows.resize(index + 1, Vec::new());
            }
            let target = &mut sheet.rows[index];
            for (column, value) in (range.first_column()..).zip(row) {
                if target.len() <= column {
                    target.resize(column + 1, String::new());
                }
                target[column] = value;
            }
        }
        Ok(())
    }

    fn sheet_name(&self, sheet_id: SheetId) -> Option<String> {
        self.sheets
            .read()
            .unwrap()
            .iter()
            .find(|(_, sheet)| sheet.sheet_id == sheet_id)
            .map(|(name, _)| name.clone())
    }

    fn delete_now(&self, sheet_id: SheetId, start: usize, end: usize) -> Result<(), StoreError> {
        let mut sheets = self.sheets.write().unwrap();
        let sheet = sheets
            .values_mut()
            .find(|sheet| sheet.sheet_id == sheet_id)
            .ok_or_else(|| StoreError::Status {
                status: 400,
                message: format!("No grid with id: {sheet_id}"),
            })?;
        if start >= end || end > sheet.rows.len() {
            return Err(StoreError::Status {
                status: 400,
                message: format!("Invalid row range [{start}, {end})"),
            });
        }
        sheet.rows.drain(start..end);
        Ok(())
    }
}

impl RowStore for InMemoryRowStore {
    fn read_range(&self, range: Range) -> StoreFuture<'_, Vec<Row>> {
        Box::pin(async move {
            self.enter(Operation::Read, range.sheet(), &range.a1())
                .await?;
            self.read_now(&range)
        })
    }

    fn append_rows(&self, range: Range, rows: Vec<Row>) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.enter(Operation::Append, range.sheet(), &range.a1())
                .await?;
            self.append_now(&range, rows)
        })
    }

    fn overwrite_range(&self, range: Range, rows: Vec<Row>) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.enter(Operation::Overwrite, range.sheet(), &range.a1())
                .await?;
            self.overwrite_now(&range, rows)
        })
    }

    fn resolve_sheet_id(&self, sheet: String) -> StoreFuture<'_, SheetId> {
        Box::pin(async move {
            self.enter(Operation::ResolveSheet, &sheet, &sheet).await?;
            self.sheets
                .read()
                .unwrap()
                .get(&sheet)
                .map(|data| data.sheet_id)
                .ok_or(StoreError::SheetNotFound(sheet))
        })
    }

    fn delete_rows(&self, sheet_id: SheetId, start: usize, end: usize) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let sheet = self.sheet_name(sheet_id).unwrap_or_default();
            self.enter(Operation::DeleteRows, &sheet, &sheet).await?;
            self.delete_now(sheet_id, start, end)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slot_booking_core::store::Table;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(ToString::to_string).collect()
    }

    fn store() -> InMemoryRowStore {
        InMemoryRowStore::new().with_table(
            "Reservations",
            vec![
                row(&["ID", "CreatedAt", "Email"]),
                row(&["1", "t", "a@x.com"]),
                row(&["2", "t", "b@y.com"]),
            ],
        )
    }

    #[tokio::test]
    async fn test_column_read_slices_cells() {
        let store = store();
        let table = Table::new("Reservations", 13);
        let column = store.read_range(table.column(2)).await.unwrap();
        assert_eq!(column, vec![row(&["Email"]), row(&["a@x.com"]), row(&["b@y.com"])]);

        let empty = store.read_range(table.column(9)).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_header_range_of_empty_sheet() {
        let store = InMemoryRowStore::new().with_table("Slots", vec![]);
        let rows = store.read_range(Table::new("Slots", 3).header_range()).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_overwrite_then_append() {
        let store = InMemoryRowStore::new().with_table("Slots", vec![]);
        let table = Table::new("Slots", 3);
        store
            .overwrite_range(table.header_range(), vec![row(&["ID", "Name", "TotalSeats"])])
            .await
            .unwrap();
        store
            .append_rows(table.full_range(), vec![row(&["1", "Acme", "2"])])
            .await
            .unwrap();
        assert_eq!(
            store.rows("Slots"),
            vec![row(&["ID", "Name", "TotalSeats"]), row(&["1", "Acme", "2"])]
        );
    }

    #[tokio::test]
    async fn test_positional_delete() {
        let store = store();
        let sheet_id = store.resolve_sheet_id("Reservations".into()).await.unwrap();
        store.delete_rows(sheet_id, 1, 2).await.unwrap();
        assert_eq!(store.rows("Reservations").len(), 2);
        assert_eq!(store.rows("Reservations")[1][0], "2");

        let out_of_range = store.delete_rows(sheet_id, 5, 6).await;
        assert!(matches!(out_of_range, Err(StoreError::Status { status: 400, .. })));
    }

    #[tokio::test]
    async fn test_unknown_sheet() {
        let store = store();
        let result = store.resolve_sheet_id("Nope".into()).await;
        assert_eq!(result, Err(StoreError::SheetNotFound("Nope".into())));
    }

    #[tokio::test]
    async fn test_injected_failures_match_target() {
        let store = store();
        let table = Table::new("Reservations", 13);
        store.fail(
            Operation::Read,
            "Reservations!C:C",
            StoreError::Request("timeout".into()),
        );

        assert!(store.read_range(table.column(2)).await.is_err());
        assert!(store.read_range(table.full_range()).await.is_ok());
        assert_eq!(store.calls(Operation::Read), 2);

        store.clear_failures();
        assert!(store.read_range(table.column(2)).await.is_ok());
    }
}
