//! Format resolution: field kind + hour format -> display and storage formats

use serde::Serialize;

use crate::data_model::{DateType, FieldKind, HourFormat, StorageKind};
use crate::format::PhpFormat;

/// Storage format of date-only values
pub const DATE_STORAGE_FORMAT: &str = "Y-m-d";
/// Storage format of date-time and all-day values
pub const DATETIME_STORAGE_FORMAT: &str = "Y-m-d\\TH:i:s";
/// Storage "format" of timestamp values: seconds since the epoch
pub const EPOCH_STORAGE_FORMAT: &str = "U";
/// Format of excluded dates in the settings and in the picker
pub const EXCLUDED_DATE_FORMAT: &str = "d.m.Y";

/// Display and storage formats of one value kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFormats {
    pub display: PhpFormat,
    pub storage: PhpFormat,
    #[serde(skip)]
    pub storage_kind: StorageKind,
}

/// Resolves formats for the kinds of one widget
#[derive(Debug, Clone)]
pub struct FormatResolver {
    hour_format: HourFormat,
    allow_seconds: bool,
    custom_format: Option<PhpFormat>,
}

impl FormatResolver {
    pub fn new(hour_format: HourFormat) -> Self {
        Self {
            hour_format,
            allow_seconds: true,
            custom_format: None,
        }
    }

    pub fn with_seconds(mut self, allow_seconds: bool) -> Self {
        self.allow_seconds = allow_seconds;
        self
    }

    /// Display format that replaces the computed one; storage is unaffected
    pub fn with_custom_format(mut self, custom_format: Option<PhpFormat>) -> Self {
        self.custom_format = custom_format;
        self
    }

    pub fn resolve(&self, kind: FieldKind) -> ResolvedFormats {
        let computed = match kind.date_type() {
            DateType::Date | DateType::Allday => DATE_STORAGE_FORMAT,
            DateType::Datetime => self.datetime_display(),
        };
        let display = self
            .custom_format
            .clone()
            .unwrap_or_else(|| PhpFormat::builtin(computed));

        let storage_kind = kind.storage();
        let storage = PhpFormat::builtin(match storage_kind {
            StorageKind::Date => DATE_STORAGE_FORMAT,
            StorageKind::DateTime => DATETIME_STORAGE_FORMAT,
            StorageKind::Epoch => EPOCH_STORAGE_FORMAT,
        });

        ResolvedFormats {
            display,
            storage,
            storage_kind,
        }
    }

    fn datetime_display(&self) -> &'static str {
        match (self.hour_format, self.allow_seconds) {
            (HourFormat::Hour24, true) => "Y-m-d H:i:s",
            (HourFormat::Hour12, true) => "Y-m-d h:i:s A",
            (HourFormat::Hour24, false) => "Y-m-d H:i",
            (HourFormat::Hour12, false) => "Y-m-d h:i A",
        }
    }

    /// Format of the time column shown by the picker
    pub fn time_format(&self) -> &'static str {
        time_format(self.hour_format)
    }
}

/// Format of the time column shown by the picker
pub fn time_format(hour_format: HourFormat) -> &'static str {
    match hour_format {
        HourFormat::Hour12 => "h:i A",
        HourFormat::Hour24 => "H:i",
    }
}

/// Resolve formats for one kind without a resolver instance
pub fn resolve(kind: FieldKind, hour_format: HourFormat, custom_format: Option<&PhpFormat>) -> ResolvedFormats {
    FormatResolver::new(hour_format)
        .with_custom_format(custom_format.cloned())
        .resolve(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_only() {
        let formats = resolve(FieldKind::DateOnly, HourFormat::Hour12, None);
        assert_eq!(formats.display.as_str(), "Y-m-d");
        assert_eq!(formats.storage.as_str(), "Y-m-d");
        assert_eq!(formats.storage_kind, StorageKind::Date);
    }

    #[test]
    fn test_datetime_storage_ignores_hour_format() {
        let h12 = resolve(FieldKind::DateTime, HourFormat::Hour12, None);
        let h24 = resolve(FieldKind::DateTime, HourFormat::Hour24, None);
        assert_eq!(h12.display.as_str(), "Y-m-d h:i:s A");
        assert_eq!(h24.display.as_str(), "Y-m-d H:i:s");
        assert_eq!(h12.storage, h24.storage);
        assert_eq!(h12.storage.as_str(), DATETIME_STORAGE_FORMAT);
    }

    #[test]
    fn test_allday_displays_date_stores_datetime() {
        let formats = resolve(FieldKind::RangeEnd(DateType::Allday), HourFormat::Hour24, None);
        assert_eq!(formats.display.as_str(), "Y-m-d");
        assert_eq!(formats.storage.as_str(), DATETIME_STORAGE_FORMAT);
    }

    #[test]
    fn test_timestamp_stores_epoch() {
        let formats = resolve(FieldKind::Timestamp, HourFormat::Hour12, None);
        assert_eq!(formats.display.as_str(), "Y-m-d h:i:s A");
        assert_eq!(formats.storage_kind, StorageKind::Epoch);
    }

    #[test]
    fn test_custom_format_overrides_display_only() {
        let custom = PhpFormat::new("d.m.Y H:i").unwrap();
        let formats = resolve(FieldKind::DateTime, HourFormat::Hour24, Some(&custom));
        assert_eq!(formats.display.as_str(), "d.m.Y H:i");
        assert_eq!(formats.storage.as_str(), DATETIME_STORAGE_FORMAT);
    }

    #[test]
    fn test_without_seconds() {
        let formats = FormatResolver::new(HourFormat::Hour24)
            .with_seconds(false)
            .resolve(FieldKind::RangeStart(DateType::Datetime));
        assert_eq!(formats.display.as_str(), "Y-m-d H:i");
        assert_eq!(time_format(HourFormat::Hour12), "h:i A");
    }
}
