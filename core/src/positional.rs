//! Delete-by-position for tables without a key index.
//!
//! The store can only remove rows by physical index, so a delete reads the
//! whole table, picks the first data row that matches and removes exactly
//! that row. The index may be stale if another writer moved rows in between;
//! there is no re-check.

use crate::error::BookingError;
use crate::store::{RowStore, Table};

/// Removes the first data row (row 0 is the header) for which `matches` holds.
///
/// Returns `Ok(false)` when no row matched; the table is left untouched.
///
/// # Errors
///
/// - [`BookingError::StoreIo`] if the read or the delete fails
/// - [`BookingError::StoreMetadata`] if the sheet identifier cannot be resolved
pub async fn delete_first_matching<F>(
    store: &dyn RowStore,
    table: &Table,
    matches: F,
) -> Result<bool, BookingError>
where
    F: Fn(&[String]) -> bool,
{
    let rows = store
        .read_range(table.full_range())
        .await
        .map_err(BookingError::StoreIo)?;

    let Some(index) = rows
        .iter()
        .enumerate()
        .skip(1)
        .find_map(|(index, row)| matches(row).then_some(index))
    else {
        return Ok(false);
    };

    let sheet_id = store
        .resolve_sheet_id(table.name().to_string())
        .await
        .map_err(BookingError::StoreMetadata)?;

    store
        .delete_rows(sheet_id, index, index + 1)
        .await
        .map_err(BookingError::StoreIo)?;

    tracing::debug!(table = table.name(), row = index, %sheet_id, "Deleted row");
    Ok(true)
}
