//! # Google Sheets Row Store
//!
//! [`SheetsClient`] implements `slot_booking_core::store::RowStore` on top of
//! the Sheets v4 REST API, one HTTP round-trip per operation.
//!
//! ## Example
//!
//! ```no_run
//! use slot_booking_sheets::{Credentials, SheetsClient};
//! use slot_booking_core::store::{RowStore, Table};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SheetsClient::new(
//!         "1AbCdEf",
//!         Credentials::detect("ya29.token"),
//!         Duration::from_secs(10),
//!     )?;
//!
//!     let rows = client.read_range(Table::new("Slots", 3).full_range()).await?;
//!     println!("{} slot rows", rows.len().saturating_sub(1));
//!     Ok(())
//! }
//! ```
//!
//! ## Operations
//!
//! | Row store | Sheets API |
//! |---|---|
//! | `read_range` | `GET spreadsheets/{id}/values/{range}` |
//! | `append_rows` | `POST spreadsheets/{id}/values/{range}:append` |
//! | `overwrite_range` | `PUT spreadsheets/{id}/values/{range}` |
//! | `resolve_sheet_id` | `GET spreadsheets/{id}?fields=sheets.properties` |
//! | `delete_rows` | `POST spreadsheets/{id}:batchUpdate` (`deleteDimension`) |

pub mod client;
pub mod error;
pub mod types;

pub use client::{Credentials, DEFAULT_API_URL, SheetsClient};
pub use error::SheetsError;
