//! Domain types: slots, reservations and the candidate a student submits.
//!
//! Storage layout (one row per record, row 0 is a header):
//!
//! ```text
//! Slots         A:C   id | name | totalSeats
//! Reservations  A:M   id | createdAt | email | lastName | firstName | courseYear |
//!                     modality | internshipNumber | month | assignedSlotId |
//!                     makeupHours | makeupHoursQty | note
//! ```

use crate::store::{Row, cell, parse_id};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a slot (creation timestamp in milliseconds).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub i64);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a reservation (creation timestamp in milliseconds).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub i64);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Slots
// ============================================================================

/// Number of stored slot columns (`A:C`).
pub const SLOT_COLUMNS: usize = 3;

/// Header row written to an empty slots table.
pub const SLOT_HEADER: [&str; SLOT_COLUMNS] = ["ID", "Name", "TotalSeats"];

/// A capacity-limited reservable placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Slot identifier
    pub id: SlotId,
    /// Display label
    pub name: String,
    /// Capacity; `0` means the stored value was missing, unparsable or not positive
    pub total_seats: u32,
}

impl Slot {
    /// Decodes a stored row. Returns `None` when the id cell is not an integer.
    ///
    /// The seat count is read like an id, so a sheet-rendered `"3.0"` is 3.
    #[must_use]
    pub fn from_row(row: &[String]) -> Option<Self> {
        let id = parse_id(cell(row, 0))?;
        let total_seats = parse_id(cell(row, 2))
            .and_then(|seats| u32::try_from(seats).ok())
            .unwrap_or(0);
        Some(Self {
            id: SlotId(id),
            name: cell(row, 1).trim().to_string(),
            total_seats,
        })
    }

    /// Encodes the slot as a storage row.
    #[must_use]
    pub fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.total_seats.to_string(),
        ]
    }

    /// Whether the row is fit to show: positive id and a non-empty name.
    #[must_use]
    pub fn is_listable(&self) -> bool {
        self.id.0 > 0 && !self.name.is_empty()
    }
}

/// A slot as shown to callers, optionally annotated with remaining capacity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    /// Slot identifier
    pub id: SlotId,
    /// Display label
    pub name: String,
    /// Capacity
    pub total_seats: u32,
    /// Free seats, when occupancy could be computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats_remaining: Option<u32>,
}

impl From<Slot> for SlotView {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id,
            name: slot.name,
            total_seats: slot.total_seats,
            seats_remaining: None,
        }
    }
}

// ============================================================================
// Reservations
// ============================================================================

/// Number of stored reservation columns (`A:M`).
pub const RESERVATION_COLUMNS: usize = 13;

/// Column holding the reservation email (`C`).
pub const EMAIL_COLUMN: usize = 2;

/// Column holding the assigned slot id (`J`).
pub const SLOT_COLUMN: usize = 9;

/// Header row written to an empty reservations table.
pub const RESERVATION_HEADER: [&str; RESERVATION_COLUMNS] = [
    "ID",
    "CreatedAt",
    "Email",
    "LastName",
    "FirstName",
    "CourseYear",
    "Modality",
    "InternshipNumber",
    "Month",
    "AssignedSlotId",
    "MakeupHours",
    "MakeupHoursQty",
    "Note",
];

/// Whether the student has hours to make up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MakeupHours {
    /// Hours to make up; a quantity is required
    Yes,
    /// Nothing to make up
    #[default]
    No,
}

impl MakeupHours {
    /// Parses `Yes` / `No`, ignoring ASCII case and surrounding whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("yes") {
            Some(Self::Yes)
        } else if value.eq_ignore_ascii_case("no") {
            Some(Self::No)
        } else {
            None
        }
    }

    /// Stored text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

/// An accepted reservation, as stored in the ledger.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Reservation identifier
    pub id: ReservationId,
    /// Creation time, RFC 3339
    pub created_at: String,
    /// Student email (unique among active reservations)
    pub email: String,
    /// Student last name
    pub last_name: String,
    /// Student first name
    pub first_name: String,
    /// Course year
    pub course_year: String,
    /// Attendance modality
    pub modality: String,
    /// Which internship of the course this is
    pub internship_number: String,
    /// Month the internship takes place
    pub month: String,
    /// Slot the seat was taken from
    pub assigned_slot_id: SlotId,
    /// Whether hours are being made up
    pub makeup_hours: MakeupHours,
    /// Hours to make up, empty when none
    pub makeup_hours_qty: String,
    /// Free-text note
    pub note: String,
}

impl Reservation {
    /// Decodes a stored row. Returns `None` when the id cell is not an integer.
    ///
    /// Missing `makeupHours` defaults to `No`; missing quantity and note default to empty.
    #[must_use]
    pub fn from_row(row: &[String]) -> Option<Self> {
        let id = parse_id(cell(row, 0))?;
        Some(Self {
            id: ReservationId(id),
            created_at: cell(row, 1).to_string(),
            email: cell(row, EMAIL_COLUMN).to_string(),
            last_name: cell(row, 3).to_string(),
            first_name: cell(row, 4).to_string(),
            course_year: cell(row, 5).to_string(),
            modality: cell(row, 6).to_string(),
            internship_number: cell(row, 7).to_string(),
            month: cell(row, 8).to_string(),
            assigned_slot_id: SlotId(parse_id(cell(row, SLOT_COLUMN)).unwrap_or(0)),
            makeup_hours: MakeupHours::parse(cell(row, 10)).unwrap_or_default(),
            makeup_hours_qty: cell(row, 11).to_string(),
            note: cell(row, 12).to_string(),
        })
    }

    /// Encodes the reservation as a storage row.
    #[must_use]
    pub fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.created_at.clone(),
            self.email.clone(),
            self.last_name.clone(),
            self.first_name.clone(),
            self.course_year.clone(),
            self.modality.clone(),
            self.internship_number.clone(),
            self.month.clone(),
            self.assigned_slot_id.to_string(),
            self.makeup_hours.as_str().to_string(),
            self.makeup_hours_qty.clone(),
            self.note.clone(),
        ]
    }
}

// ============================================================================
// Candidate (caller input)
// ============================================================================

/// A reservation request exactly as the caller sent it.
///
/// Every field is optional so that shape validation can report all missing
/// fields at once instead of failing on the first during decoding. Fields
/// that a form may send as numbers accept either JSON strings or numbers.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationCandidate {
    /// Student email
    pub email: Option<String>,
    /// Student last name
    pub last_name: Option<String>,
    /// Student first name
    pub first_name: Option<String>,
    /// Course year
    #[serde(deserialize_with = "text_or_number")]
    pub course_year: Option<String>,
    /// Attendance modality
    pub modality: Option<String>,
    /// Which internship of the course this is
    #[serde(deserialize_with = "text_or_number")]
    pub internship_number: Option<String>,
    /// Month
    pub month: Option<String>,
    /// Target slot id
    #[serde(deserialize_with = "text_or_number")]
    pub assigned_slot_id: Option<String>,
    /// `Yes` or `No`
    pub makeup_hours: Option<String>,
    /// Hours to make up (required with `Yes`, minimum 0.5)
    #[serde(deserialize_with = "text_or_number")]
    pub makeup_hours_qty: Option<String>,
    /// Free-text note
    pub note: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Integer(n) => n.to_string(),
            TextOrNumber::Float(n) => n.to_string(),
        }),
    )
}

/// A candidate that passed shape validation. Only `validation::validate` builds one.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidReservation {
    /// Trimmed email
    pub email: String,
    /// Trimmed last name
    pub last_name: String,
    /// Trimmed first name
    pub first_name: String,
    /// Course year
    pub course_year: String,
    /// Modality
    pub modality: String,
    /// Internship number
    pub internship_number: String,
    /// Month
    pub month: String,
    /// Target slot
    pub assigned_slot_id: SlotId,
    /// Makeup flag
    pub makeup_hours: MakeupHours,
    /// Quantity text, empty unless `makeup_hours` is `Yes`
    pub makeup_hours_qty: String,
    /// Note, empty when absent
    pub note: String,
}

impl ValidReservation {
    /// Key used for duplicate detection and locking: trimmed, ASCII-lowercased email.
    #[must_use]
    pub fn email_key(&self) -> String {
        normalize_email(&self.email)
    }

    /// Stamps the candidate with its id and creation time.
    #[must_use]
    pub fn into_reservation(self, id: ReservationId, created_at: String) -> Reservation {
        Reservation {
            id,
            created_at,
            email: self.email,
            last_name: self.last_name,
            first_name: self.first_name,
            course_year: self.course_year,
            modality: self.modality,
            internship_number: self.internship_number,
            month: self.month,
            assigned_slot_id: self.assigned_slot_id,
            makeup_hours: self.makeup_hours,
            makeup_hours_qty: self.makeup_hours_qty,
            note: self.note,
        }
    }
}

/// Normalises an email for comparison.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Result of an accepted submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Submitted {
    /// Id of the new reservation
    pub id: ReservationId,
}
