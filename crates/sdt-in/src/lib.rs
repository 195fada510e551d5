//! SDT-IN: submitted text to stored date/time values
//!
//! This crate turns what the operator typed into the picker into canonical
//! stored values, one field at a time.
//!
//! ```text
//! raw "2024-01-01" ──┐
//!                    ├─ ValueNormalizer (start) ─┐
//! raw "2024-01-03" ──┘  ValueNormalizer (end)  ──┴─ RangeValidator ─→ NormalizedValue
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sdt_core::{FieldDefinition, RequestContext};
//! use sdt_in::{FieldWidget, RawItem};
//!
//! let widget = FieldWidget::new(&field, &RequestContext::new(chrono_tz::Europe::Warsaw))?;
//! let massaged = widget.massage(&[RawItem::range("2024-01-01", "2024-01-03")]);
//! for error in massaged.errors() {
//!     eprintln!("{}", error.user_message());
//! }
//! ```

pub mod display;
pub mod mask;
pub mod normalizer;
pub mod range;

pub use normalizer::{NormalizationError, ValueNormalizer};
pub use range::{FieldPair, RangeError, RangeValidator};

use sdt_core::{
    ConfigurationError, FieldDefinition, FieldKind, FieldKinds, NormalizedValue, RequestContext, SdtError,
    StoredValue,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// One submitted delta of a field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub end_value: Option<String>,
}

impl RawItem {
    pub fn single(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            end_value: None,
        }
    }

    pub fn range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            value: Some(start.into()),
            end_value: Some(end.into()),
        }
    }
}

/// Which input of a delta a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Value,
    EndValue,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Value => f.write_str("value"),
            Property::EndValue => f.write_str("end_value"),
        }
    }
}

/// A rejected delta
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("delta {delta}, {property}: {source}")]
    Normalization {
        delta: usize,
        property: Property,
        label: String,
        #[source]
        source: NormalizationError,
    },
    #[error("delta {delta}: {source}")]
    Range {
        delta: usize,
        #[source]
        source: RangeError,
    },
    #[error("delta {delta}: {label} needs both a start and an end date")]
    IncompleteRange { delta: usize, label: String },
}

impl FieldError {
    pub fn delta(&self) -> usize {
        match self {
            FieldError::Normalization { delta, .. }
            | FieldError::Range { delta, .. }
            | FieldError::IncompleteRange { delta, .. } => *delta,
        }
    }

    /// Message to attach to the field in the form
    pub fn user_message(&self) -> String {
        match self {
            FieldError::Normalization { label, source, .. } => match source {
                NormalizationError::Unparseable { format, .. } => {
                    format!("The {} date is invalid. Please enter a date in the format {}.", label, format)
                }
                NormalizationError::NonexistentLocalTime { input, .. } => {
                    format!("The {} date {} does not exist in your timezone.", label, input)
                }
                NormalizationError::InvalidStoredValue { .. } => {
                    format!("The {} date could not be read.", label)
                }
            },
            FieldError::Range { source, .. } => source.user_message(),
            FieldError::IncompleteRange { label, .. } => {
                format!("The {} needs both a start and an end date.", label)
            }
        }
    }
}

impl From<NormalizationError> for SdtError {
    fn from(err: NormalizationError) -> Self {
        SdtError::Parse(err.to_string())
    }
}

impl From<RangeError> for SdtError {
    fn from(err: RangeError) -> Self {
        SdtError::Range(err.to_string())
    }
}

impl From<FieldError> for SdtError {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::Normalization { .. } => SdtError::Parse(err.to_string()),
            FieldError::Range { .. } | FieldError::IncompleteRange { .. } => SdtError::Range(err.to_string()),
        }
    }
}

/// Outcome of massaging every delta of one field
#[derive(Debug, Clone, PartialEq)]
pub struct Massaged {
    pub outcomes: Vec<Result<Option<NormalizedValue>, FieldError>>,
}

impl Massaged {
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(Result::is_ok)
    }

    /// Accepted values in delta order (`None` for blank deltas)
    pub fn values(&self) -> Vec<Option<&NormalizedValue>> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.as_ref().ok())
            .map(Option::as_ref)
            .collect()
    }

    pub fn errors(&self) -> Vec<&FieldError> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.as_ref().err())
            .collect()
    }
}

/// The normalization pipeline of one field instance
#[derive(Debug, Clone)]
pub struct FieldWidget {
    label: String,
    kinds: FieldKinds,
    start: ValueNormalizer,
    end: Option<(ValueNormalizer, RangeValidator)>,
}

impl FieldWidget {
    /// Build the pipeline; invalid settings fail here, never at submission
    pub fn new(field: &FieldDefinition, ctx: &RequestContext) -> Result<Self, ConfigurationError> {
        field.widget.validate()?;
        let kinds = field.kinds()?;
        let resolver = field.widget.format_resolver()?;
        let allow_blank = field.widget.allow_blank;

        let normalizer = |kind: FieldKind| {
            ValueNormalizer::new(resolver.resolve(kind), ctx.timezones_for(kind)).allow_blank(allow_blank)
        };

        let end = kinds.end.map(|kind| {
            (
                normalizer(kind),
                RangeValidator::new(field.name.clone(), field.display_label()),
            )
        });

        Ok(Self {
            label: field.display_label().to_string(),
            kinds,
            start: normalizer(kinds.start),
            end,
        })
    }

    pub fn kinds(&self) -> FieldKinds {
        self.kinds
    }

    pub fn start_normalizer(&self) -> &ValueNormalizer {
        &self.start
    }

    /// Normalize every delta independently; one bad delta never stops the rest
    pub fn massage(&self, items: &[RawItem]) -> Massaged {
        let outcomes = items
            .iter()
            .enumerate()
            .map(|(delta, item)| self.normalize_item(delta, item))
            .inspect(|outcome| {
                if let Err(err) = outcome {
                    warn!(label = %self.label, error = %err, "rejected submitted value");
                }
            })
            .collect();
        Massaged { outcomes }
    }

    pub fn normalize_item(&self, delta: usize, item: &RawItem) -> Result<Option<NormalizedValue>, FieldError> {
        let start = self.normalize_property(delta, Property::Value, &self.start, self.kinds.start, &item.value)?;

        let Some((end_normalizer, validator)) = &self.end else {
            return Ok(start.map(|value| NormalizedValue::Single { value }));
        };
        let end_kind = self.kinds.end.unwrap_or(self.kinds.start);
        let end = self.normalize_property(delta, Property::EndValue, end_normalizer, end_kind, &item.end_value)?;

        match (start, end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => {
                validator
                    .validate(&start.instant, &end.instant)
                    .map_err(|source| FieldError::Range { delta, source })?;
                Ok(Some(NormalizedValue::Range { start, end }))
            }
            _ => Err(FieldError::IncompleteRange {
                delta,
                label: self.label.clone(),
            }),
        }
    }

    fn normalize_property(
        &self,
        delta: usize,
        property: Property,
        normalizer: &ValueNormalizer,
        kind: FieldKind,
        raw: &Option<String>,
    ) -> Result<Option<sdt_core::StoredInstant>, FieldError> {
        normalizer
            .normalize_instant(raw.as_deref().unwrap_or_default(), kind)
            .map_err(|source| FieldError::Normalization {
                delta,
                property,
                label: self.label.clone(),
                source,
            })
    }

    /// Display strings for an existing stored value (start, optional end)
    pub fn default_value(&self, value: &StoredValue, end_value: Option<&StoredValue>) -> Result<RawItem, NormalizationError> {
        let start = self.start.display(value, self.kinds.start)?;
        let end = match (&self.end, self.kinds.end, end_value) {
            (Some((normalizer, _)), Some(kind), Some(stored)) => Some(normalizer.display(stored, kind)?),
            _ => None,
        };
        Ok(RawItem {
            value: Some(start),
            end_value: end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdt_core::{DateType, FieldType, WidgetSettings};

    fn field(field_type: FieldType, datetime_type: DateType) -> FieldDefinition {
        FieldDefinition {
            name: "field_when".to_string(),
            label: "When".to_string(),
            field_type,
            datetime_type,
            required: false,
            widget: WidgetSettings::default(),
        }
    }

    #[test]
    fn test_single_value_field() {
        let widget = FieldWidget::new(&field(FieldType::Datetime, DateType::Date), &RequestContext::default()).unwrap();
        let massaged = widget.massage(&[RawItem::single("2024-03-15"), RawItem::default()]);
        assert!(massaged.is_valid());
        let values = massaged.values();
        assert_eq!(
            values[0].unwrap().start().stored,
            StoredValue::Text("2024-03-15".to_string())
        );
        assert!(values[1].is_none());
    }

    #[test]
    fn test_bad_delta_does_not_stop_siblings() {
        let widget =
            FieldWidget::new(&field(FieldType::Datetime, DateType::Datetime), &RequestContext::default()).unwrap();
        let massaged = widget.massage(&[
            RawItem::single("garbage"),
            RawItem::single("2024-03-15 10:00:00"),
        ]);
        assert!(!massaged.is_valid());
        assert_eq!(massaged.errors().len(), 1);
        assert_eq!(massaged.errors()[0].delta(), 0);
        assert!(massaged.outcomes[1].as_ref().unwrap().is_some());
    }

    #[test]
    fn test_range_end_before_start() {
        let widget =
            FieldWidget::new(&field(FieldType::Daterange, DateType::Datetime), &RequestContext::default()).unwrap();
        let err = widget
            .normalize_item(0, &RawItem::range("2024-03-15 10:00:00", "2024-03-15 09:00:00"))
            .unwrap_err();
        assert_eq!(err.user_message(), "The When end date cannot be before the start date");
    }

    #[test]
    fn test_half_filled_range() {
        let widget =
            FieldWidget::new(&field(FieldType::Daterange, DateType::Date), &RequestContext::default()).unwrap();
        let item = RawItem {
            value: Some("2024-03-15".to_string()),
            end_value: None,
        };
        assert!(matches!(
            widget.normalize_item(3, &item),
            Err(FieldError::IncompleteRange { delta: 3, .. })
        ));
    }

    #[test]
    fn test_invalid_settings_fail_construction() {
        let mut definition = field(FieldType::Datetime, DateType::Datetime);
        definition.widget.allow_times = 45;
        assert_eq!(
            FieldWidget::new(&definition, &RequestContext::default()).unwrap_err(),
            ConfigurationError::InvalidGranularity(45)
        );
    }

    #[test]
    fn test_underscore_format_fails_construction() {
        let mut definition = field(FieldType::Datetime, DateType::Datetime);
        definition.widget.custom_format = Some("Y_m_d H:i".to_string());
        assert_eq!(
            FieldWidget::new(&definition, &RequestContext::default()).unwrap_err(),
            ConfigurationError::MaskPlaceholderInFormat("Y_m_d H:i".to_string())
        );

        definition.widget.custom_format = Some("Y.m.d H:i".to_string());
        let widget = FieldWidget::new(&definition, &RequestContext::default()).unwrap();
        assert!(widget.normalize_item(0, &RawItem::single("2024.03.15 10:00")).unwrap().is_some());
    }

    #[test]
    fn test_unparseable_user_message_names_format() {
        let widget =
            FieldWidget::new(&field(FieldType::Datetime, DateType::Datetime), &RequestContext::default()).unwrap();
        let err = widget.normalize_item(0, &RawItem::single("15/03/2024")).unwrap_err();
        assert_eq!(
            err.user_message(),
            "The When date is invalid. Please enter a date in the format Y-m-d H:i:s."
        );
        assert!(matches!(SdtError::from(err), SdtError::Parse(_)));
    }
}
