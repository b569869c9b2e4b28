//! Locale-tagged values.

use serde::{Deserialize, Serialize};

/// A value tagged with an `xml:lang` locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedValue {
    /// Locale (e.g. `it`).
    pub lang: String,
    /// The value.
    pub value: String,
}

impl LocalizedValue {
    /// Creates a localized value.
    #[must_use]
    pub fn new(lang: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            value: value.into(),
        }
    }

    /// Parses a `locale|value` entry.
    ///
    /// The entry is split on the first `|` and both parts are trimmed.
    /// Returns `None` if there is no separator.
    #[must_use]
    pub fn parse(entry: &str) -> Option<Self> {
        let (lang, value) = entry.split_once('|')?;
        Some(Self::new(lang.trim(), value.trim()))
    }

    /// Parses a `locale|value` entry, using `default_locale` for entries
    /// without a locale.
    #[must_use]
    pub fn parse_or_default(entry: &str, default_locale: &str) -> Self {
        Self::parse(entry).unwrap_or_else(|| Self::new(default_locale, entry.trim()))
    }
}
