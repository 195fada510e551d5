//! Value normalization for SDT-IN.
//!
//! Turns the text the picker submitted into the canonical stored value:
//! - Parse with the display format in the display timezone
//! - Apply the kind's default time (noon for dates, day bounds for all-day)
//! - Convert to the storage timezone
//! - Serialize with the storage format, or as epoch seconds

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use sdt_core::{
    FieldKind, FieldTimezones, NormalizedValue, PhpFormat, ResolvedFormats, StorageKind, StoredInstant,
    StoredValue,
};
use thiserror::Error;
use tracing::debug;

use crate::mask::{self, InputShape};

/// Errors that can occur while normalizing a submitted value
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("'{input}' does not match the format {format}: {reason}")]
    Unparseable {
        input: String,
        format: String,
        reason: String,
    },
    #[error("'{input}' does not exist in timezone {timezone}")]
    NonexistentLocalTime { input: String, timezone: String },
    #[error("stored value '{value}' does not match the storage format {format}")]
    InvalidStoredValue { value: String, format: String },
}

impl NormalizationError {
    fn unparseable(input: &str, format: &PhpFormat, reason: impl Into<String>) -> Self {
        NormalizationError::Unparseable {
            input: input.to_string(),
            format: format.to_string(),
            reason: reason.into(),
        }
    }
}

/// Normalizes the values of one field
#[derive(Debug, Clone)]
pub struct ValueNormalizer {
    formats: ResolvedFormats,
    timezones: FieldTimezones,
    allow_blank: bool,
}

impl ValueNormalizer {
    pub fn new(formats: ResolvedFormats, timezones: FieldTimezones) -> Self {
        Self {
            formats,
            timezones,
            allow_blank: true,
        }
    }

    pub fn allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = allow_blank;
        self
    }

    pub fn formats(&self) -> &ResolvedFormats {
        &self.formats
    }

    pub fn timezones(&self) -> &FieldTimezones {
        &self.timezones
    }

    /// Normalize one raw value. `Ok(None)` means the field was left blank.
    pub fn normalize(&self, raw: &str, kind: FieldKind) -> Result<Option<NormalizedValue>, NormalizationError> {
        Ok(self
            .normalize_instant(raw, kind)?
            .map(|value| NormalizedValue::Single { value }))
    }

    /// Normalize one raw value to its instant and stored form
    pub fn normalize_instant(&self, raw: &str, kind: FieldKind) -> Result<Option<StoredInstant>, NormalizationError> {
        let text = match mask::classify(raw) {
            InputShape::Filled(text) => text,
            InputShape::Blank if self.allow_blank => return Ok(None),
            InputShape::IncompleteMask if self.allow_blank => {
                debug!(untouched = mask::is_empty_mask(raw), "masked input left incomplete, treating as blank");
                return Ok(None);
            }
            InputShape::Blank => {
                return Err(NormalizationError::unparseable(raw, &self.formats.display, "a value is required"))
            }
            InputShape::IncompleteMask => {
                return Err(NormalizationError::unparseable(
                    raw,
                    &self.formats.display,
                    "masked input is incomplete",
                ))
            }
        };

        let local = self.parse_local(text, kind)?;
        let stored = serialize(&local, &self.formats, &self.timezones.storage);
        debug!(kind = ?kind, input = text, stored = %stored, "normalized value");

        Ok(Some(StoredInstant {
            instant: local.with_timezone(&Utc),
            stored,
        }))
    }

    /// Parse in the display timezone and apply the kind's default time
    fn parse_local(&self, text: &str, kind: FieldKind) -> Result<DateTime<Tz>, NormalizationError> {
        let tz = &self.timezones.display;
        let naive = parse_naive(text, &self.formats.display)?;

        if self.formats.display.is_epoch() {
            // Epoch seconds already name an instant; only a forced time of day
            // goes through the wall clock.
            let instant = Utc.from_utc_datetime(&naive).with_timezone(tz);
            return match kind.default_time() {
                Some(time) => localize(tz, instant.date_naive().and_time(time), text),
                None => Ok(instant),
            };
        }

        let naive = match kind.default_time() {
            Some(time) => naive.date().and_time(time),
            None => naive,
        };
        localize(tz, naive, text)
    }

    /// Render a stored value back into the display format (the widget's
    /// default value for an existing item).
    pub fn display(&self, stored: &StoredValue, kind: FieldKind) -> Result<String, NormalizationError> {
        crate::display::display_value(stored, &self.formats, &self.timezones, kind)
    }
}

/// Parse with the display format; date-only formats yield midnight
pub(crate) fn parse_naive(text: &str, format: &PhpFormat) -> Result<NaiveDateTime, NormalizationError> {
    let pattern = format.chrono_pattern();
    if format.has_time() {
        NaiveDateTime::parse_from_str(text, pattern)
            .map_err(|e| NormalizationError::unparseable(text, format, e.to_string()))
    } else {
        NaiveDate::parse_from_str(text, pattern)
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|e| NormalizationError::unparseable(text, format, e.to_string()))
    }
}

/// Attach a timezone; ambiguous wall times resolve to the earlier instant
pub(crate) fn localize(tz: &Tz, naive: NaiveDateTime, input: &str) -> Result<DateTime<Tz>, NormalizationError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(NormalizationError::NonexistentLocalTime {
            input: input.to_string(),
            timezone: tz.name().to_string(),
        }),
    }
}

fn serialize(local: &DateTime<Tz>, formats: &ResolvedFormats, storage: &Tz) -> StoredValue {
    match formats.storage_kind {
        StorageKind::Epoch => StoredValue::Epoch(local.timestamp()),
        StorageKind::Date | StorageKind::DateTime => StoredValue::Text(
            local
                .with_timezone(storage)
                .format(formats.storage.chrono_pattern())
                .to_string(),
        ),
    }
}
