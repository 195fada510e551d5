//! Locale aliasing for the datetimepicker.
//!
//! The picker ships its own translations under short codes. A request
//! language is folded onto them:
//! - exact match, ignoring case and `_` vs `-`
//! - known aliases (`pt-br`, `zh-hant`, `nb`, ...)
//! - the base language (`de-AT` -> `de`)
//! - `en`

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Locale codes the picker ships translations for
pub const SUPPORTED_LOCALES: &[&str] = &[
    "ar", "az", "bg", "bs", "ca", "ch", "cs", "da", "de", "el", "en", "en-GB", "es", "et", "eu", "fa", "fi",
    "fr", "gl", "he", "hr", "hu", "id", "it", "ja", "ko", "kr", "lt", "lv", "mk", "mn", "nl", "no", "pl", "pt",
    "pt-BR", "ro", "ru", "se", "sk", "sl", "sq", "sr", "sr-YU", "sv", "th", "tr", "uk", "vi", "zh", "zh-TW",
];

pub const FALLBACK_LOCALE: &str = "en";

lazy_static! {
    /// Language codes whose picker locale differs from the code itself
    static ref ALIASES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("pt-br", "pt-BR");
        m.insert("zh-hant", "zh-TW");
        m.insert("zh-tw", "zh-TW");
        m.insert("zh-hk", "zh-TW");
        m.insert("zh-hans", "zh");
        m.insert("zh-cn", "zh");
        m.insert("nb", "no");
        m.insert("nn", "no");
        m.insert("sr-latn", "sr-YU");
        m.insert("en-gb", "en-GB");
        m
    };
}

fn supported(code: &str) -> Option<&'static str> {
    SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|locale| locale.eq_ignore_ascii_case(code))
}

/// Picker locale for a request language
pub fn picker_locale(language: &str) -> &'static str {
    let code = language.trim().replace('_', "-").to_ascii_lowercase();
    if code.is_empty() {
        return FALLBACK_LOCALE;
    }

    if let Some(locale) = supported(&code) {
        return locale;
    }
    if let Some(locale) = ALIASES.get(code.as_str()).copied() {
        return locale;
    }

    let base = code.split('-').next().unwrap_or_default();
    ALIASES
        .get(base)
        .copied()
        .or_else(|| supported(base))
        .unwrap_or(FALLBACK_LOCALE)
}
