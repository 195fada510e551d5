//! Data Model: field kinds, granularity, time slots and normalized values
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ConfigurationError;

/// Storage type of the field the widget is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single date or date-time value
    Datetime,
    /// Start/end pair
    Daterange,
    /// Integer epoch value
    #[serde(alias = "created")]
    Timestamp,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Datetime => "datetime",
            FieldType::Daterange => "daterange",
            FieldType::Timestamp => "timestamp",
        }
    }
}

/// What part of a date/time the field keeps (`datetime_type` field setting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateType {
    /// Date component only
    Date,
    /// Date and time of day
    #[default]
    Datetime,
    /// Whole days, pinned to day boundaries
    Allday,
}

impl DateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateType::Date => "date",
            DateType::Datetime => "datetime",
            DateType::Allday => "allday",
        }
    }
}

/// The kind of a single value slot
///
/// Range endpoints carry the date type of their field so the normalizer can
/// dispatch on one tag instead of per-widget code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    DateOnly,
    DateTime,
    AllDay,
    Timestamp,
    RangeStart(DateType),
    RangeEnd(DateType),
}

/// How a normalized instant is serialized for storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Date component only (`Y-m-d`)
    Date,
    /// Date and time (`Y-m-d\TH:i:s`)
    DateTime,
    /// Integer seconds since the Unix epoch
    Epoch,
}

/// Time of day assigned to date-only values so the timezone shift can be
/// reversed when the value is displayed again.
pub const DATE_ONLY_DEFAULT_TIME: (u32, u32, u32) = (12, 0, 0);

impl FieldKind {
    /// Date type the kind behaves like
    pub fn date_type(&self) -> DateType {
        match self {
            FieldKind::DateOnly => DateType::Date,
            FieldKind::DateTime | FieldKind::Timestamp => DateType::Datetime,
            FieldKind::AllDay => DateType::Allday,
            FieldKind::RangeStart(t) | FieldKind::RangeEnd(t) => *t,
        }
    }

    /// Whether the user picks a time of day for this kind
    pub fn has_time(&self) -> bool {
        self.date_type() == DateType::Datetime
    }

    pub fn is_range(&self) -> bool {
        matches!(self, FieldKind::RangeStart(_) | FieldKind::RangeEnd(_))
    }

    pub fn storage(&self) -> StorageKind {
        match self {
            FieldKind::Timestamp => StorageKind::Epoch,
            _ if self.date_type() == DateType::Date => StorageKind::Date,
            _ => StorageKind::DateTime,
        }
    }

    /// Time of day forced onto the parsed value before conversion, if any
    pub fn default_time(&self) -> Option<NaiveTime> {
        let (h, m, s) = match self {
            FieldKind::DateOnly | FieldKind::RangeStart(DateType::Date) | FieldKind::RangeEnd(DateType::Date) => {
                DATE_ONLY_DEFAULT_TIME
            }
            FieldKind::AllDay | FieldKind::RangeStart(DateType::Allday) => (0, 0, 0),
            FieldKind::RangeEnd(DateType::Allday) => (23, 59, 59),
            _ => return None,
        };
        NaiveTime::from_hms_opt(h, m, s)
    }

    /// Widget type advertised to the picker ("date" or "datetime")
    pub fn widget_type(&self) -> &'static str {
        if self.has_time() {
            "datetime"
        } else {
            "date"
        }
    }
}

/// Value kinds of one field: a single kind, or the two endpoints of a range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKinds {
    pub start: FieldKind,
    pub end: Option<FieldKind>,
}

impl FieldKinds {
    /// Map a field's storage type and date type to its value kinds
    pub fn for_field(field_type: FieldType, datetime_type: DateType) -> Result<Self, ConfigurationError> {
        let single = |kind| Ok(FieldKinds { start: kind, end: None });
        match (field_type, datetime_type) {
            (FieldType::Datetime, DateType::Date) => single(FieldKind::DateOnly),
            (FieldType::Datetime, DateType::Datetime) => single(FieldKind::DateTime),
            (FieldType::Timestamp, DateType::Datetime) => single(FieldKind::Timestamp),
            (FieldType::Daterange, t) => Ok(FieldKinds {
                start: FieldKind::RangeStart(t),
                end: Some(FieldKind::RangeEnd(t)),
            }),
            (field_type, datetime_type) => Err(ConfigurationError::UnsupportedKind {
                field_type: field_type.as_str().to_string(),
                datetime_type: datetime_type.as_str().to_string(),
            }),
        }
    }

    pub fn is_range(&self) -> bool {
        self.end.is_some()
    }
}

/// Hour display preference of the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HourFormat {
    #[serde(rename = "12h")]
    Hour12,
    #[default]
    #[serde(rename = "24h")]
    Hour24,
}

impl HourFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            HourFormat::Hour12 => "12h",
            HourFormat::Hour24 => "24h",
        }
    }
}

/// Minute spacing of the time picker; always divides 60 (60 means whole hours)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Granularity(u32);

impl Granularity {
    /// Whole-hour steps
    pub const HOURLY: Granularity = Granularity(60);

    pub fn new(minutes: u32) -> Result<Self, ConfigurationError> {
        if minutes == 0 || minutes > 60 || 60 % minutes != 0 {
            return Err(ConfigurationError::InvalidGranularity(minutes));
        }
        Ok(Granularity(minutes))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// Number of slots offered within one hour
    pub fn steps_per_hour(&self) -> u32 {
        60 / self.0
    }

    pub fn is_hourly(&self) -> bool {
        self.0 == 60
    }
}

/// Ordered set of hours (0-23) the time picker offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowedHours(BTreeSet<u8>);

impl AllowedHours {
    /// Every hour of the day
    pub fn all() -> Self {
        AllowedHours((0..=23).collect())
    }

    pub fn from_hours<I>(hours: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut set = BTreeSet::new();
        for hour in hours {
            if hour > 23 {
                return Err(ConfigurationError::HourOutOfRange(hour));
            }
            set.insert(hour as u8);
        }
        Ok(AllowedHours(set))
    }

    /// Parse the comma separated settings value; blank means no restriction
    pub fn parse(value: &str) -> Result<Self, ConfigurationError> {
        if value.trim().is_empty() {
            return Ok(Self::all());
        }
        let hours = value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| ConfigurationError::InvalidHour(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_hours(hours)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// "HH:MM" time of day; zero padding keeps lexicographic order chronological
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSlot(String);

impl TimeSlot {
    pub(crate) fn from_parts(hour: &str, minute: &str) -> Self {
        TimeSlot(format!("{}:{}", hour, minute))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialized form handed to the storage collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Epoch(i64),
    Text(String),
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Epoch(seconds) => write!(f, "{}", seconds),
            StoredValue::Text(text) => f.write_str(text),
        }
    }
}

/// A normalized instant together with its storage serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredInstant {
    pub instant: DateTime<Utc>,
    pub stored: StoredValue,
}

/// Result of normalizing one delta of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NormalizedValue {
    Single { value: StoredInstant },
    Range { start: StoredInstant, end: StoredInstant },
}

impl NormalizedValue {
    /// Start instant (the only instant of a single value)
    pub fn start(&self) -> &StoredInstant {
        match self {
            NormalizedValue::Single { value } => value,
            NormalizedValue::Range { start, .. } => start,
        }
    }

    pub fn end(&self) -> Option<&StoredInstant> {
        match self {
            NormalizedValue::Single { .. } => None,
            NormalizedValue::Range { end, .. } => Some(end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_divides_sixty() {
        for minutes in [1, 2, 5, 10, 15, 20, 30, 60] {
            assert!(Granularity::new(minutes).is_ok(), "{} should be valid", minutes);
        }
        for minutes in [0, 7, 25, 45, 90] {
            assert_eq!(
                Granularity::new(minutes),
                Err(ConfigurationError::InvalidGranularity(minutes))
            );
        }
        assert!(Granularity::HOURLY.is_hourly());
        assert_eq!(Granularity::new(15).unwrap().steps_per_hour(), 4);
    }

    #[test]
    fn test_allowed_hours_parse() {
        let hours = AllowedHours::parse("17, 8,9,,9").unwrap();
        assert_eq!(hours.iter().collect::<Vec<_>>(), vec![8, 9, 17]);
        assert_eq!(AllowedHours::parse("  ").unwrap().len(), 24);
    }

    #[test]
    fn test_allowed_hours_rejects_out_of_range() {
        assert_eq!(AllowedHours::parse("8,24"), Err(ConfigurationError::HourOutOfRange(24)));
        assert_eq!(
            AllowedHours::parse("8,noon"),
            Err(ConfigurationError::InvalidHour("noon".to_string()))
        );
    }

    #[test]
    fn test_field_kinds_mapping() {
        let kinds = FieldKinds::for_field(FieldType::Daterange, DateType::Allday).unwrap();
        assert_eq!(kinds.start, FieldKind::RangeStart(DateType::Allday));
        assert_eq!(kinds.end, Some(FieldKind::RangeEnd(DateType::Allday)));

        let kinds = FieldKinds::for_field(FieldType::Datetime, DateType::Date).unwrap();
        assert_eq!(kinds.start, FieldKind::DateOnly);
        assert!(!kinds.is_range());

        assert!(matches!(
            FieldKinds::for_field(FieldType::Datetime, DateType::Allday),
            Err(ConfigurationError::UnsupportedKind { .. })
        ));
        assert!(FieldKinds::for_field(FieldType::Timestamp, DateType::Date).is_err());
    }

    #[test]
    fn test_default_times() {
        assert_eq!(FieldKind::DateOnly.default_time(), NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(
            FieldKind::RangeEnd(DateType::Allday).default_time(),
            NaiveTime::from_hms_opt(23, 59, 59)
        );
        assert_eq!(FieldKind::DateTime.default_time(), None);
        assert_eq!(FieldKind::Timestamp.storage(), StorageKind::Epoch);
        assert_eq!(FieldKind::AllDay.storage(), StorageKind::DateTime);
    }

    #[test]
    fn test_hour_format_serde() {
        let format: HourFormat = serde_json::from_str("\"12h\"").unwrap();
        assert_eq!(format, HourFormat::Hour12);
        assert_eq!(serde_json::to_string(&HourFormat::Hour24).unwrap(), "\"24h\"");
    }
}
