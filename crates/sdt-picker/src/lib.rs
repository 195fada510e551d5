//! SDT-PICKER: widget settings to datetimepicker configuration
//!
//! This crate computes what the client-side picker is initialized with:
//! the option object, the element data attributes and the settings summary
//! shown next to the widget in the field settings.
//!
//! # Example
//!
//! ```ignore
//! use sdt_core::{FieldKind, RequestContext, WidgetSettings};
//! use sdt_picker::PickerConfigBuilder;
//!
//! let ctx = RequestContext::new(chrono_tz::Europe::Warsaw).with_language("pt-br");
//! let config = PickerConfigBuilder::new(&WidgetSettings::default(), &ctx)
//!     .kind(FieldKind::DateTime)
//!     .build()?;
//! println!("{}", config.widget_options());
//! ```

pub mod builder;
pub mod calendar;
pub mod locale;
pub mod summary;

pub use builder::{PickerConfig, PickerConfigBuilder, DEFAULT_YEAR_START};
pub use calendar::{disabled_weekdays, excluded_dates};
pub use locale::picker_locale;
pub use summary::settings_summary;

use sdt_core::{ConfigurationError, FieldDefinition, RequestContext};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Picker setup for one input of a field
#[derive(Debug, Clone, Serialize)]
pub struct PickerInput {
    /// `value` or `end_value`
    pub property: &'static str,
    pub options: Value,
    pub attributes: BTreeMap<&'static str, String>,
}

/// Picker setup for every input of a field plus its settings summary
#[derive(Debug, Clone, Serialize)]
pub struct FieldPicker {
    pub field: String,
    pub inputs: Vec<PickerInput>,
    pub summary: Vec<String>,
}

/// Build the picker setup of a field; range fields get one input per end
pub fn field_picker(field: &FieldDefinition, ctx: &RequestContext) -> Result<FieldPicker, ConfigurationError> {
    let kinds = field.kinds()?;
    let ends = [("value", Some(kinds.start)), ("end_value", kinds.end)];

    let mut inputs = Vec::new();
    for (property, kind) in ends {
        let Some(kind) = kind else { continue };
        let config = PickerConfigBuilder::new(&field.widget, ctx).kind(kind).build()?;
        inputs.push(PickerInput {
            property,
            options: config.widget_options(),
            attributes: config.data_attributes(),
        });
    }

    Ok(FieldPicker {
        field: field.name.clone(),
        inputs,
        summary: settings_summary(&field.widget),
    })
}
