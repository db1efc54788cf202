//! Shape validation of reservation candidates.
//!
//! Pure, no I/O. Collects every violated rule so the caller can show all
//! problems at once.

use crate::error::BookingError;
use crate::store::parse_id;
use crate::types::{MakeupHours, ReservationCandidate, SlotId, ValidReservation};
use regex::Regex;
use std::sync::LazyLock;

/// Minimum hours a makeup request may ask for.
pub const MIN_MAKEUP_HOURS: f64 = 0.5;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Checks a candidate and converts it into a [`ValidReservation`].
///
/// # Errors
///
/// Returns [`BookingError::Validation`] listing every violated rule.
pub fn validate(candidate: &ReservationCandidate) -> Result<ValidReservation, BookingError> {
    let mut errors = Vec::new();

    let email = trimmed(candidate.email.as_ref());
    if !EMAIL_PATTERN.is_match(email) {
        errors.push("Email is not valid".to_string());
    }

    let last_name = trimmed(candidate.last_name.as_ref());
    if last_name.chars().count() < 2 {
        errors.push("Last name must be at least 2 characters".to_string());
    }

    let first_name = trimmed(candidate.first_name.as_ref());
    if first_name.chars().count() < 2 {
        errors.push("First name must be at least 2 characters".to_string());
    }

    let required = [
        ("courseYear", &candidate.course_year),
        ("modality", &candidate.modality),
        ("internshipNumber", &candidate.internship_number),
        ("month", &candidate.month),
        ("assignedSlotId", &candidate.assigned_slot_id),
        ("makeupHours", &candidate.makeup_hours),
    ];
    for (field, value) in required {
        if trimmed(value.as_ref()).is_empty() {
            errors.push(format!("{field} is required"));
        }
    }

    let slot_text = trimmed(candidate.assigned_slot_id.as_ref());
    let slot_id = parse_id(slot_text);
    if !slot_text.is_empty() && slot_id.is_none() {
        errors.push("assignedSlotId must be a numeric slot id".to_string());
    }

    let makeup_text = trimmed(candidate.makeup_hours.as_ref());
    let makeup_hours = MakeupHours::parse(makeup_text);
    if !makeup_text.is_empty() && makeup_hours.is_none() {
        errors.push("makeupHours must be \"Yes\" or \"No\"".to_string());
    }

    let quantity = trimmed(candidate.makeup_hours_qty.as_ref());
    if makeup_hours == Some(MakeupHours::Yes) && !is_valid_quantity(quantity) {
        errors.push(format!(
            "Makeup hours quantity is required (minimum {MIN_MAKEUP_HOURS})"
        ));
    }

    match (slot_id, makeup_hours) {
        (Some(slot_id), Some(makeup_hours)) if errors.is_empty() => Ok(ValidReservation {
            email: email.to_string(),
            last_name: last_name.to_string(),
            first_name: first_name.to_string(),
            course_year: trimmed(candidate.course_year.as_ref()).to_string(),
            modality: trimmed(candidate.modality.as_ref()).to_string(),
            internship_number: trimmed(candidate.internship_number.as_ref()).to_string(),
            month: trimmed(candidate.month.as_ref()).to_string(),
            assigned_slot_id: SlotId(slot_id),
            makeup_hours,
            makeup_hours_qty: match makeup_hours {
                MakeupHours::Yes => quantity.to_string(),
                MakeupHours::No => String::new(),
            },
            note: trimmed(candidate.note.as_ref()).to_string(),
        }),
        _ => Err(BookingError::Validation(errors)),
    }
}

fn trimmed(value: Option<&String>) -> &str {
    value.map_or("", |v| v.trim())
}

fn is_valid_quantity(quantity: &str) -> bool {
    quantity
        .parse::<f64>()
        .is_ok_and(|hours| hours.is_finite() && hours >= MIN_MAKEUP_HOURS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete() -> ReservationCandidate {
        ReservationCandidate {
            email: Some("anna.rossi@example.com".into()),
            last_name: Some("Rossi".into()),
            first_name: Some("Anna".into()),
            course_year: Some("3".into()),
            modality: Some("Full-time".into()),
            internship_number: Some("1".into()),
            month: Some("March".into()),
            assigned_slot_id: Some("1700000000000".into()),
            makeup_hours: Some("No".into()),
            makeup_hours_qty: None,
            note: None,
        }
    }

    fn messages(candidate: &ReservationCandidate) -> Vec<String> {
        match validate(candidate) {
            Err(BookingError::Validation(messages)) => messages,
            other => unreachable!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_candidate_is_valid() {
        let valid = validate(&complete()).unwrap();
        assert_eq!(valid.assigned_slot_id, SlotId(1_700_000_000_000));
        assert_eq!(valid.makeup_hours, MakeupHours::No);
        assert_eq!(valid.makeup_hours_qty, "");
    }

    #[test]
    fn test_names_are_trimmed_before_length_check() {
        let mut candidate = complete();
        candidate.last_name = Some("  R ".into());
        candidate.first_name = Some(" Al ".into());
        let errors = messages(&candidate);
        assert_eq!(errors, vec!["Last name must be at least 2 characters"]);
    }

    #[test]
    fn test_every_violation_is_reported() {
        let errors = messages(&ReservationCandidate::default());
        assert!(errors.contains(&"Email is not valid".to_string()));
        assert!(errors.contains(&"Last name must be at least 2 characters".to_string()));
        assert!(errors.contains(&"First name must be at least 2 characters".to_string()));
        for field in [
            "courseYear",
            "modality",
            "internshipNumber",
            "month",
            "assignedSlotId",
            "makeupHours",
        ] {
            assert!(errors.contains(&format!("{field} is required")), "missing {field}");
        }
        assert_eq!(errors.len(), 9);
    }

    #[test]
    fn test_email_pattern() {
        for bad in ["", "plain", "a@b", "a b@x.com", "a@@x.com", "@x.com", "a@x."] {
            let mut candidate = complete();
            candidate.email = Some(bad.into());
            assert_eq!(messages(&candidate), vec!["Email is not valid"], "{bad}");
        }
        let mut candidate = complete();
        candidate.email = Some(" a@x.com ".into());
        assert_eq!(validate(&candidate).unwrap().email, "a@x.com");
    }

    #[test]
    fn test_makeup_quantity_below_minimum() {
        let mut candidate = complete();
        candidate.makeup_hours = Some("Yes".into());
        candidate.makeup_hours_qty = Some("0.3".into());
        let errors = messages(&candidate);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("0.5"));
    }

    #[test]
    fn test_makeup_quantity_missing_or_garbage() {
        for qty in [None, Some(""), Some("lots"), Some("NaN")] {
            let mut candidate = complete();
            candidate.makeup_hours = Some("Yes".into());
            candidate.makeup_hours_qty = qty.map(Into::into);
            assert_eq!(messages(&candidate).len(), 1, "{qty:?}");
        }
    }

    #[test]
    fn test_makeup_quantity_accepted() {
        let mut candidate = complete();
        candidate.makeup_hours = Some("Yes".into());
        candidate.makeup_hours_qty = Some("0.5".into());
        let valid = validate(&candidate).unwrap();
        assert_eq!(valid.makeup_hours, MakeupHours::Yes);
        assert_eq!(valid.makeup_hours_qty, "0.5");
    }

    #[test]
    fn test_quantity_ignored_without_makeup() {
        let mut candidate = complete();
        candidate.makeup_hours_qty = Some("0.1".into());
        assert_eq!(validate(&candidate).unwrap().makeup_hours_qty, "");
    }

    #[test]
    fn test_non_numeric_slot_and_unknown_makeup_flag() {
        let mut candidate = complete();
        candidate.assigned_slot_id = Some("acme".into());
        candidate.makeup_hours = Some("Maybe".into());
        let errors = messages(&candidate);
        assert_eq!(
            errors,
            vec![
                "assignedSlotId must be a numeric slot id",
                "makeupHours must be \"Yes\" or \"No\"",
            ]
        );
    }
}
