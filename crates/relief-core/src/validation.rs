//! # Payload Validation
//!
//! Serde enforces shape (required fields, types, no unknown keys); the
//! [`Validate`] trait enforces the rules serde cannot express.

use crate::error::ValidationError;

/// Business-rule validation for request payloads.
pub trait Validate {
    /// Check the payload, returning the first violated rule.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Reject empty or whitespace-only text.
pub(crate) fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

/// Reject empty text when the optional field is present.
pub(crate) fn non_empty_if_present(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| non_empty(field, v))
}

/// Reject values outside `min..=max`.
pub(crate) fn in_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}
