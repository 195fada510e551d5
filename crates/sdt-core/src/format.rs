//! PHP-style date format strings ("Y-m-d H:i:s") and their chrono patterns.
//!
//! The picker widget and the stored settings speak the PHP `date()` token
//! language. Parsing and formatting go through chrono, so every format is
//! translated once into a strftime pattern.
//!
//! Letters that PHP does not treat as tokens are copied literally, as PHP
//! does. Tokens PHP knows but this translator cannot express are rejected.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::ConfigurationError;

/// PHP tokens with no chrono equivalent used here
const UNSUPPORTED_TOKENS: &[char] = &[
    'S', 'z', 'W', 't', 'L', 'o', 'X', 'x', 'B', 'u', 'v', 'e', 'I', 'O', 'P', 'p', 'T', 'Z', 'c', 'r',
];

/// A translated PHP date format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhpFormat {
    source: String,
    pattern: String,
    has_date: bool,
    has_time: bool,
    epoch: bool,
}

struct Translation {
    pattern: String,
    has_date: bool,
    has_time: bool,
    epoch: bool,
    unsupported: Option<char>,
}

fn translate(source: &str) -> Translation {
    let mut pattern = String::with_capacity(source.len() * 2);
    let mut has_date = false;
    let mut has_time = false;
    let mut epoch = false;
    let mut unsupported = None;
    let mut chars = source.chars();

    while let Some(c) = chars.next() {
        let mapped = match c {
            '\\' => {
                if let Some(literal) = chars.next() {
                    push_literal(&mut pattern, literal);
                }
                continue;
            }
            'd' => "%d",
            'j' => "%-d",
            'D' => "%a",
            'l' => "%A",
            'N' => "%u",
            'w' => "%w",
            'm' => "%m",
            'n' => "%-m",
            'M' => "%b",
            'F' => "%B",
            'Y' => "%Y",
            'y' => "%y",
            'H' => "%H",
            'G' => "%-H",
            'h' => "%I",
            'g' => "%-I",
            'i' => "%M",
            's' => "%S",
            'A' => "%p",
            'a' => "%P",
            'U' => "%s",
            other => {
                if UNSUPPORTED_TOKENS.contains(&other) && unsupported.is_none() {
                    unsupported = Some(other);
                }
                push_literal(&mut pattern, other);
                continue;
            }
        };
        match c {
            'd' | 'j' | 'D' | 'l' | 'N' | 'w' | 'm' | 'n' | 'M' | 'F' | 'Y' | 'y' => has_date = true,
            'U' => {
                has_date = true;
                has_time = true;
                epoch = true;
            }
            _ => has_time = true,
        }
        pattern.push_str(mapped);
    }

    Translation {
        pattern,
        has_date,
        has_time,
        epoch,
        unsupported,
    }
}

fn push_literal(pattern: &mut String, c: char) {
    if c == '%' {
        pattern.push_str("%%");
    } else {
        pattern.push(c);
    }
}

impl PhpFormat {
    /// Translate a user supplied format, rejecting unsupported tokens
    pub fn new(source: &str) -> Result<Self, ConfigurationError> {
        let translation = translate(source);
        if let Some(token) = translation.unsupported {
            return Err(ConfigurationError::UnsupportedFormatToken {
                format: source.to_string(),
                token,
            });
        }
        Ok(Self::from_translation(source, translation))
    }

    /// Built-in formats only use supported tokens
    pub(crate) fn builtin(source: &'static str) -> Self {
        Self::from_translation(source, translate(source))
    }

    fn from_translation(source: &str, translation: Translation) -> Self {
        Self {
            source: source.to_string(),
            pattern: translation.pattern,
            has_date: translation.has_date,
            has_time: translation.has_time,
            epoch: translation.epoch,
        }
    }

    /// The PHP format as configured
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Equivalent chrono strftime pattern
    pub fn chrono_pattern(&self) -> &str {
        &self.pattern
    }

    pub fn has_date(&self) -> bool {
        self.has_date
    }

    pub fn has_time(&self) -> bool {
        self.has_time
    }

    /// Values carry epoch seconds, an absolute instant independent of any timezone
    pub fn is_epoch(&self) -> bool {
        self.epoch
    }
}

impl fmt::Display for PhpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for PhpFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}
