//! Unified Error Model
use thiserror::Error;

/// Invalid or contradictory field settings.
///
/// Raised while a widget is being constructed, never while a submitted value
/// is processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unsupported field kind: {field_type} with {datetime_type} values")]
    UnsupportedKind {
        field_type: String,
        datetime_type: String,
    },

    #[error("granularity must divide 60 minutes, got {0}")]
    InvalidGranularity(u32),

    #[error("allowed hour is not a number: '{0}'")]
    InvalidHour(String),

    #[error("allowed hour out of range 0-23: {0}")]
    HourOutOfRange(u32),

    #[error("disabled weekday out of range 0-7: {0}")]
    InvalidWeekday(u32),

    #[error("unknown timezone: '{0}'")]
    UnknownTimezone(String),

    #[error("format '{format}' uses unsupported token '{token}'")]
    UnsupportedFormatToken { format: String, token: char },

    #[error("format '{0}' contains '_', the input mask placeholder")]
    MaskPlaceholderInFormat(String),

    #[error("settings: {0}")]
    Settings(String),
}

/// Error surfaced at the service boundary, with a stable code prefix.
#[derive(Error, Debug)]
pub enum SdtError {
    #[error("CONFIG/{0}")]
    Config(#[from] ConfigurationError),

    #[error("PARSE/{0}")]
    Parse(String),

    #[error("RANGE/{0}")]
    Range(String),

    #[error("SERIALIZE/{0}")]
    Serialize(String),
}

impl SdtError {
    /// Code prefix without the message
    pub fn code(&self) -> &'static str {
        match self {
            SdtError::Config(_) => "CONFIG",
            SdtError::Parse(_) => "PARSE",
            SdtError::Range(_) => "RANGE",
            SdtError::Serialize(_) => "SERIALIZE",
        }
    }
}
