//! Start/end ordering for range fields

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// The field a start/end pair belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPair {
    /// Machine name
    pub field: String,
    /// Label shown to the user
    pub label: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("{field}: end {end} is before start {start}")]
    EndBeforeStart {
        field: String,
        label: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl RangeError {
    /// Message to attach to the field in the form
    pub fn user_message(&self) -> String {
        match self {
            RangeError::EndBeforeStart { label, .. } => {
                format!("The {} end date cannot be before the start date", label)
            }
        }
    }
}

/// Rejects a normalized pair whose end precedes its start
#[derive(Debug, Clone)]
pub struct RangeValidator {
    pair: FieldPair,
}

impl RangeValidator {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pair: FieldPair {
                field: field.into(),
                label: label.into(),
            },
        }
    }

    pub fn pair(&self) -> &FieldPair {
        &self.pair
    }

    /// Equal instants form a valid zero-length range
    pub fn validate(&self, start: &DateTime<Utc>, end: &DateTime<Utc>) -> Result<(), RangeError> {
        validate(start, end, &self.pair)
    }
}

pub fn validate(start: &DateTime<Utc>, end: &DateTime<Utc>, pair: &FieldPair) -> Result<(), RangeError> {
    if end < start {
        warn!(field = %pair.field, %start, %end, "range end before start");
        return Err(RangeError::EndBeforeStart {
            field: pair.field.clone(),
            label: pair.label.clone(),
            start: *start,
            end: *end,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_ordered_and_equal_pass() {
        let validator = RangeValidator::new("field_when", "When");
        assert!(validator.validate(&at(9), &at(17)).is_ok());
        assert!(validator.validate(&at(9), &at(9)).is_ok());
    }

    #[test]
    fn test_end_before_start_names_field() {
        let validator = RangeValidator::new("field_when", "When");
        let err = validator.validate(&at(17), &at(9)).unwrap_err();
        assert_eq!(err.user_message(), "The When end date cannot be before the start date");
        match err {
            RangeError::EndBeforeStart { field, .. } => assert_eq!(field, "field_when"),
        }
    }
}
