//! Widget and field settings
//!
//! Mirrors the settings form of the widget:
//! - Hour format and minute granularity
//! - Allowed hours, disabled weekdays and excluded dates
//! - Picker presentation flags (inline, mask, theme)
//! - Min/max date and year bounds for the fast year selector
//!
//! Settings are loaded from YAML (see `fixtures/widgets.yaml`) or JSON.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::data_model::{AllowedHours, DateType, FieldKinds, FieldType, Granularity, HourFormat};
use crate::error::ConfigurationError;
use crate::format::PhpFormat;
use crate::resolver::FormatResolver;

/// Picker color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Dark => "dark",
        }
    }
}

/// Per-widget settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    pub hour_format: HourFormat,

    /// Minute granularity
    #[serde(deserialize_with = "number_or_string")]
    pub allow_times: u32,

    /// Comma separated hours; empty means every hour
    pub allowed_hours: String,

    /// Checkbox values 1-7 (7 = Sunday); 0 marks an unchecked box
    #[serde(deserialize_with = "checkbox_values")]
    pub disable_days: Vec<u32>,

    /// One d.m.Y date per line
    pub exclude_date: String,

    pub inline: bool,
    pub mask: bool,
    pub datetimepicker_theme: Theme,

    #[serde(deserialize_with = "string_or_number")]
    pub min_date: String,
    #[serde(deserialize_with = "string_or_number")]
    pub max_date: String,
    #[serde(deserialize_with = "string_or_number")]
    pub year_start: String,
    #[serde(deserialize_with = "string_or_number")]
    pub year_end: String,

    pub allow_blank: bool,
    pub allow_seconds: bool,

    /// Display format replacing the computed one
    pub custom_format: Option<String>,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            hour_format: HourFormat::Hour24,
            allow_times: 15,
            allowed_hours: String::new(),
            disable_days: Vec::new(),
            exclude_date: String::new(),
            inline: false,
            mask: false,
            datetimepicker_theme: Theme::Default,
            min_date: String::new(),
            max_date: String::new(),
            year_start: String::new(),
            year_end: String::new(),
            allow_blank: true,
            allow_seconds: true,
            custom_format: None,
        }
    }
}

impl WidgetSettings {
    pub fn granularity(&self) -> Result<Granularity, ConfigurationError> {
        Granularity::new(self.allow_times)
    }

    pub fn allowed_hours(&self) -> Result<AllowedHours, ConfigurationError> {
        AllowedHours::parse(&self.allowed_hours)
    }

    /// A blank custom format means none.
    ///
    /// `_` is refused even as a literal: submitted text containing it is read
    /// as an unfinished mask.
    pub fn custom_format(&self) -> Result<Option<PhpFormat>, ConfigurationError> {
        match self.custom_format.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(format) if format.contains('_') => {
                Err(ConfigurationError::MaskPlaceholderInFormat(format.to_string()))
            }
            Some(format) => PhpFormat::new(format).map(Some),
        }
    }

    pub fn format_resolver(&self) -> Result<FormatResolver, ConfigurationError> {
        Ok(FormatResolver::new(self.hour_format)
            .with_seconds(self.allow_seconds)
            .with_custom_format(self.custom_format()?))
    }

    /// Check every setting that can be wrong
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.granularity()?;
        self.allowed_hours()?;
        self.custom_format()?;
        if let Some(day) = self.disable_days.iter().find(|day| **day > 7) {
            return Err(ConfigurationError::InvalidWeekday(*day));
        }
        Ok(())
    }
}

/// A field the widget is attached to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub datetime_type: DateType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub widget: WidgetSettings,
}

impl FieldDefinition {
    pub fn kinds(&self) -> Result<FieldKinds, ConfigurationError> {
        FieldKinds::for_field(self.field_type, self.datetime_type)
    }

    /// Label for user-facing messages, falling back to the machine name
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Top-level settings file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsFile {
    pub version: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl SettingsFile {
    /// Load settings from a YAML file
    pub fn load(path: &str) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::Settings(format!("failed to read {}: {}", path, e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigurationError> {
        let file: SettingsFile = serde_yaml::from_str(yaml)
            .map_err(|e| ConfigurationError::Settings(format!("failed to parse settings YAML: {}", e)))?;
        for field in &file.fields {
            field.kinds()?;
            field.widget.validate()?;
        }
        debug!(version = %file.version, fields = file.fields.len(), "loaded widget settings");
        Ok(file)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

impl NumberOrString {
    fn into_u32<E: serde::de::Error>(self) -> Result<u32, E> {
        match self {
            NumberOrString::Number(n) => u32::try_from(n).map_err(E::custom),
            NumberOrString::Text(s) if s.trim().is_empty() => Ok(0),
            NumberOrString::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a number, got '{}'", s))),
        }
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.into_u32()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n.to_string(),
        NumberOrString::Text(s) => s,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CheckboxValues {
    List(Vec<NumberOrString>),
    Map(BTreeMap<String, NumberOrString>),
}

fn checkbox_values<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = match CheckboxValues::deserialize(deserializer)? {
        CheckboxValues::List(values) => values,
        CheckboxValues::Map(map) => map.into_values().collect(),
    };
    values.into_iter().map(NumberOrString::into_u32).collect()
}
