//! Request Context: ambient values sourced once per request and passed explicitly
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::data_model::FieldKind;
use crate::error::ConfigurationError;

/// Timezone pair used to interpret and store one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTimezones {
    /// Timezone the picker shows the value in
    pub display: Tz,
    /// Timezone the value is stored in
    pub storage: Tz,
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Timezone of the current user
    pub display_timezone: Tz,
    /// Canonical storage timezone
    pub storage_timezone: Tz,
    /// Regional first day of week (0 = Sunday)
    pub first_day: u8,
    /// Current interface language
    pub language: String,
    /// Anchor for "today" defaults
    pub now: DateTime<Utc>,
    pub trace_id: String,
}

impl RequestContext {
    pub fn new(display_timezone: Tz) -> Self {
        Self {
            display_timezone,
            storage_timezone: Tz::UTC,
            first_day: 0,
            language: "en".to_string(),
            now: Utc::now(),
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn with_storage_timezone(mut self, storage_timezone: Tz) -> Self {
        self.storage_timezone = storage_timezone;
        self
    }

    pub fn with_first_day(mut self, first_day: u8) -> Self {
        self.first_day = first_day % 7;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Today's date as seen by the user
    pub fn today(&self) -> NaiveDate {
        self.now.with_timezone(&self.display_timezone).date_naive()
    }

    /// Date-only values are shown in the storage timezone so the calendar
    /// date never shifts; everything else is shown in the user's timezone.
    pub fn timezones_for(&self, kind: FieldKind) -> FieldTimezones {
        let display = match kind {
            FieldKind::DateOnly => self.storage_timezone,
            _ => self.display_timezone,
        };
        FieldTimezones {
            display,
            storage: self.storage_timezone,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

/// Look up an IANA timezone name
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigurationError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigurationError::UnknownTimezone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::data_model::DateType;

    #[test]
    fn test_date_only_displays_in_storage_timezone() {
        let ctx = RequestContext::new(chrono_tz::Europe::Warsaw);
        let date_only = ctx.timezones_for(FieldKind::DateOnly);
        assert_eq!(date_only.display, Tz::UTC);
        assert_eq!(date_only.storage, Tz::UTC);

        let allday = ctx.timezones_for(FieldKind::RangeStart(DateType::Allday));
        assert_eq!(allday.display, chrono_tz::Europe::Warsaw);
    }

    #[test]
    fn test_today_uses_display_timezone() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 23, 30, 0).unwrap();
        let ctx = RequestContext::new(chrono_tz::Asia::Tokyo).with_now(now);
        assert_eq!(ctx.today(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("America/New_York").unwrap(), chrono_tz::America::New_York);
        assert_eq!(
            parse_timezone("Mars/Olympus"),
            Err(ConfigurationError::UnknownTimezone("Mars/Olympus".to_string()))
        );
    }
}
