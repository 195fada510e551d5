//! Inverse of normalization: stored value -> display string.
//!
//! Used to pre-fill the widget with an existing value. Date-only values get
//! the same default time they were stored with, so the round trip through
//! the timezone conversion lands on the original calendar date.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sdt_core::{FieldKind, FieldTimezones, ResolvedFormats, StorageKind, StoredValue};

use crate::normalizer::{localize, NormalizationError};

pub fn display_value(
    stored: &StoredValue,
    formats: &ResolvedFormats,
    timezones: &FieldTimezones,
    kind: FieldKind,
) -> Result<String, NormalizationError> {
    let invalid = || NormalizationError::InvalidStoredValue {
        value: stored.to_string(),
        format: formats.storage.to_string(),
    };

    let instant: DateTime<Utc> = match (formats.storage_kind, stored) {
        (StorageKind::Epoch, StoredValue::Epoch(seconds)) => {
            DateTime::from_timestamp(*seconds, 0).ok_or_else(invalid)?
        }
        (StorageKind::Epoch, StoredValue::Text(text)) => {
            let seconds: i64 = text.trim().parse().map_err(|_| invalid())?;
            DateTime::from_timestamp(seconds, 0).ok_or_else(invalid)?
        }
        (StorageKind::Date, StoredValue::Text(text)) => {
            let date = NaiveDate::parse_from_str(text.trim(), formats.storage.chrono_pattern())
                .map_err(|_| invalid())?;
            let time = kind.default_time().unwrap_or_default();
            localize(&timezones.storage, date.and_time(time), text)?.with_timezone(&Utc)
        }
        (StorageKind::DateTime, StoredValue::Text(text)) => {
            let naive = NaiveDateTime::parse_from_str(text.trim(), formats.storage.chrono_pattern())
                .map_err(|_| invalid())?;
            localize(&timezones.storage, naive, text)?.with_timezone(&Utc)
        }
        (_, StoredValue::Epoch(_)) => return Err(invalid()),
    };

    Ok(instant
        .with_timezone(&timezones.display)
        .format(formats.display.chrono_pattern())
        .to_string())
}
