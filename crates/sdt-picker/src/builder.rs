//! Picker configuration builder.
//!
//! Merges the widget settings with everything computed from them:
//! - Resolved display/storage formats for the field kind
//! - The time slots offered by the time column
//! - Weekday and excluded-date restrictions in the picker's conventions
//! - Date and year bounds, defaulted from the request's "today"
//!
//! The result is an immutable [`PickerConfig`], rendered either as the
//! picker's option object or as element data attributes.

use chrono::Datelike;
use chrono_tz::Tz;
use sdt_core::resolver::EXCLUDED_DATE_FORMAT;
use sdt_core::{
    generate, AllowedHours, ConfigurationError, FieldKind, Granularity, HourFormat, PhpFormat, RequestContext,
    Theme, TimeSlot, WidgetSettings,
};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::calendar::{disabled_weekdays, excluded_dates};
use crate::locale::picker_locale;

/// First year of the fast year selector when none is configured
pub const DEFAULT_YEAR_START: i32 = 1970;

fn tz_name<S: Serializer>(tz: &Tz, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(tz.name())
}

/// Everything the picker needs for one field instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickerConfig {
    pub kind: FieldKind,
    pub display_format: PhpFormat,
    pub storage_format: PhpFormat,
    pub time_format: &'static str,
    #[serde(serialize_with = "tz_name")]
    pub timezone_display: Tz,
    #[serde(serialize_with = "tz_name")]
    pub timezone_storage: Tz,
    pub hour_format: HourFormat,
    pub allowed_hours: AllowedHours,
    pub granularity: Granularity,
    /// Empty for kinds without a time part
    pub allowed_times: Vec<TimeSlot>,
    /// 0 = Sunday .. 6 = Saturday
    pub disabled_weekdays: BTreeSet<u8>,
    pub excluded_dates: Vec<String>,
    pub min_date: String,
    pub max_date: String,
    pub year_start: i32,
    pub year_end: i32,
    pub first_day: u8,
    pub locale: &'static str,
    pub theme: Theme,
    pub inline: bool,
    pub masked: bool,
    pub allow_blank: bool,
}

impl PickerConfig {
    pub fn has_time(&self) -> bool {
        self.kind.has_time()
    }

    /// Option object passed to the datetimepicker
    pub fn widget_options(&self) -> Value {
        json!({
            "format": self.display_format.as_str(),
            "formatTime": self.time_format,
            "formatDate": EXCLUDED_DATE_FORMAT,
            "timepicker": self.has_time(),
            "lazyInit": true,
            "todayButton": true,
            "dayOfWeekStart": self.first_day,
            "allowTimes": self.allowed_times,
            "disabledWeekDays": self.disabled_weekdays,
            "disabledDates": self.excluded_dates,
            "inline": self.inline,
            "mask": self.masked,
            "minDate": self.min_date,
            "maxDate": self.max_date,
            "yearStart": self.year_start,
            "yearEnd": self.year_end,
            "theme": self.theme.as_str(),
            "lang": self.locale,
        })
    }

    /// Data attributes set on the input element
    pub fn data_attributes(&self) -> BTreeMap<&'static str, String> {
        let hours: Vec<u8> = self.allowed_hours.iter().collect();
        let flag = |on: bool| (if on { "1" } else { "0" }).to_string();

        let mut attributes = BTreeMap::new();
        attributes.insert("data-single-date-time", self.kind.widget_type().to_string());
        attributes.insert("data-hour-format", self.hour_format.as_str().to_string());
        attributes.insert("data-first-day", self.first_day.to_string());
        attributes.insert("data-disable-days", json!(self.disabled_weekdays).to_string());
        attributes.insert("data-allow-times", self.granularity.minutes().to_string());
        attributes.insert("data-allowed-hours", json!(hours).to_string());
        attributes.insert("data-inline", flag(self.inline));
        attributes.insert("data-mask", flag(self.masked));
        attributes.insert("data-datetimepicker-theme", self.theme.as_str().to_string());
        attributes.insert("data-exclude-date", json!(self.excluded_dates).to_string());
        attributes.insert("data-min-date", self.min_date.clone());
        attributes.insert("data-max-date", self.max_date.clone());
        attributes.insert("data-year-start", self.year_start.to_string());
        attributes.insert("data-year-end", self.year_end.to_string());
        attributes
    }
}

/// Builds a [`PickerConfig`] from widget settings and the request context
#[derive(Debug, Clone)]
pub struct PickerConfigBuilder<'a> {
    settings: &'a WidgetSettings,
    ctx: &'a RequestContext,
    kind: FieldKind,
}

impl<'a> PickerConfigBuilder<'a> {
    pub fn new(settings: &'a WidgetSettings, ctx: &'a RequestContext) -> Self {
        Self {
            settings,
            ctx,
            kind: FieldKind::DateTime,
        }
    }

    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn build(self) -> Result<PickerConfig, ConfigurationError> {
        let settings = self.settings;
        settings.validate()?;

        let granularity = settings.granularity()?;
        let allowed_hours = settings.allowed_hours()?;
        let resolver = settings.format_resolver()?;
        let formats = resolver.resolve(self.kind);
        let timezones = self.ctx.timezones_for(self.kind);

        let allowed_times = if self.kind.has_time() {
            generate(&allowed_hours, granularity)
        } else {
            Vec::new()
        };

        let today = self.ctx.today();
        let today_text = today.format("%Y-%m-%d").to_string();
        let bound = |value: &str| {
            if value.trim().is_empty() {
                today_text.clone()
            } else {
                value.trim().to_string()
            }
        };

        let config = PickerConfig {
            kind: self.kind,
            display_format: formats.display,
            storage_format: formats.storage,
            time_format: resolver.time_format(),
            timezone_display: timezones.display,
            timezone_storage: timezones.storage,
            hour_format: settings.hour_format,
            allowed_hours,
            granularity,
            allowed_times,
            disabled_weekdays: disabled_weekdays(&settings.disable_days),
            excluded_dates: excluded_dates(&settings.exclude_date),
            min_date: bound(&settings.min_date),
            max_date: bound(&settings.max_date),
            year_start: parse_year("year_start", &settings.year_start, DEFAULT_YEAR_START)?,
            year_end: parse_year("year_end", &settings.year_end, today.year())?,
            first_day: self.ctx.first_day,
            locale: picker_locale(&self.ctx.language),
            theme: settings.datetimepicker_theme,
            inline: settings.inline,
            masked: settings.mask,
            allow_blank: settings.allow_blank,
        };

        debug!(
            trace_id = %self.ctx.trace_id,
            kind = ?config.kind,
            format = %config.display_format,
            slots = config.allowed_times.len(),
            "built picker config"
        );
        Ok(config)
    }
}

fn parse_year(setting: &str, value: &str, default: i32) -> Result<i32, ConfigurationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(default);
    }
    value
        .parse()
        .map_err(|_| ConfigurationError::Settings(format!("{} must be a year, got '{}'", setting, value)))
}
