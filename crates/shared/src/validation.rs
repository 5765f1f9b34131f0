//! Common validation utilities for inspection scheduling requests.

use chrono::{DateTime, Duration, Utc};
use validator::ValidationError;

/// Maximum length of an inspection address.
pub const MAX_ADDRESS_LENGTH: usize = 255;

/// Maximum length of a free-form note.
pub const MAX_NOTE_LENGTH: usize = 1000;

/// Maximum length of contract terms text.
pub const MAX_TERMS_LENGTH: usize = 5000;

/// How far in the future an inspection may be booked (days).
const MAX_BOOKING_HORIZON_DAYS: i64 = 90;

/// Allowed clock skew when rejecting past appointment dates (minutes).
const PAST_DATE_TOLERANCE_MINUTES: i64 = 5;

/// Validates that an inspection address is non-empty and within length bounds.
pub fn validate_inspection_address(address: &str) -> Result<(), ValidationError> {
    let trimmed = address.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_ADDRESS_LENGTH {
        let mut err = ValidationError::new("inspection_address");
        err.message = Some("Address must be 1-255 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a note is within length bounds.
pub fn validate_note(note: &str) -> Result<(), ValidationError> {
    if note.len() > MAX_NOTE_LENGTH {
        let mut err = ValidationError::new("note_length");
        err.message = Some("Note must be at most 1000 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that an appointment date is neither in the past (beyond clock
/// skew tolerance) nor past the booking horizon.
pub fn validate_inspection_date(date: DateTime<Utc>) -> Result<(), ValidationError> {
    let now = Utc::now();
    if date < now - Duration::minutes(PAST_DATE_TOLERANCE_MINUTES) {
        let mut err = ValidationError::new("inspection_date_past");
        err.message = Some("Inspection date is in the past".into());
        return Err(err);
    }
    if date > now + Duration::days(MAX_BOOKING_HORIZON_DAYS) {
        let mut err = ValidationError::new("inspection_date_horizon");
        err.message = Some("Inspection date is more than 90 days out".into());
        return Err(err);
    }
    Ok(())
}
