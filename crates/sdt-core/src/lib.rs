//! SDT Core: data model, formats and time slots for the single date/time widget
//!
//! Everything in this crate is a pure computation over field settings and
//! the explicit per-request context. The input side (`sdt-in`) and the
//! picker side (`sdt-picker`) both build on it.
//!
//! # Example
//!
//! ```ignore
//! use sdt_core::{FieldKind, HourFormat, FormatResolver, generate, AllowedHours, Granularity};
//!
//! let formats = FormatResolver::new(HourFormat::Hour12).resolve(FieldKind::DateTime);
//! assert_eq!(formats.display.as_str(), "Y-m-d h:i:s A");
//!
//! let slots = generate(&AllowedHours::from_hours([5])?, Granularity::new(15)?);
//! assert_eq!(slots.len(), 4);
//! ```

pub mod context;
pub mod data_model;
pub mod error;
pub mod format;
pub mod resolver;
pub mod settings;
pub mod slots;

pub use context::{parse_timezone, FieldTimezones, RequestContext};
pub use data_model::{
    AllowedHours, DateType, FieldKind, FieldKinds, FieldType, Granularity, HourFormat,
    NormalizedValue, StorageKind, StoredInstant, StoredValue, TimeSlot,
};
pub use error::{ConfigurationError, SdtError};
pub use format::PhpFormat;
pub use resolver::{resolve, FormatResolver, ResolvedFormats};
pub use settings::{FieldDefinition, SettingsFile, Theme, WidgetSettings};
pub use slots::generate;

/// Engine version reported by the service
pub const SDT_VERSION: &str = "1.0.0";
