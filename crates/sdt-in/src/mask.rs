//! Masked input detection.
//!
//! A masked text input shows a template such as `____-__-__ __:__` and
//! replaces placeholders as the user types. A value that still contains
//! placeholders was never completed and carries no date.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Placeholder character of the picker's input mask
    static ref PLACEHOLDER: Regex = Regex::new(r"_").unwrap();

    /// Nothing but placeholders and template separators
    static ref EMPTY_MASK: Regex = Regex::new(r"^[_\s.:/\-]*$").unwrap();
}

/// Shape of a raw submitted value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape<'a> {
    /// Empty or whitespace only
    Blank,
    /// Masked input with unfilled positions
    IncompleteMask,
    /// Something to parse (trimmed)
    Filled(&'a str),
}

pub fn classify(raw: &str) -> InputShape<'_> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        InputShape::Blank
    } else if PLACEHOLDER.is_match(trimmed) {
        InputShape::IncompleteMask
    } else {
        InputShape::Filled(trimmed)
    }
}

/// True when the value is an untouched mask template
pub fn is_empty_mask(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty() && PLACEHOLDER.is_match(trimmed) && EMPTY_MASK.is_match(trimmed)
}
