//! Field checks shared by the entity drafts.

use crate::db::DatabaseError;

pub const MAX_PERSON_NAME: usize = 50;
pub const MAX_LONG_TEXT: usize = 100;

/// Required text: non-blank and at most `max` characters.
pub fn require_text(field: &str, value: &str, max: usize) -> Result<(), DatabaseError> {
    if value.trim().is_empty() {
        return Err(DatabaseError::invalid(field, "must not be blank"));
    }
    optional_text(field, Some(value), max)
}

pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<(), DatabaseError> {
    match value {
        Some(v) if v.chars().count() > max => Err(DatabaseError::invalid(
            field,
            format!("must be at most {max} characters"),
        )),
        _ => Ok(()),
    }
}

pub fn require_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), DatabaseError> {
    if value < min || value > max {
        return Err(DatabaseError::invalid(
            field,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(())
}
