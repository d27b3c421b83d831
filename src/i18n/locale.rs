use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::DEFAULT_LOCALE;

/// Two-letter UI language tag (e.g. `en`, `id`)
///
/// The backend may report any tag; unknown tags still round-trip, and message lookup
/// falls back to English for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Parse a user-supplied tag, accepting only two ASCII letters
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.len() == 2 && tag.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Self(tag.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Derive a tag from a POSIX locale string like `id_ID.UTF-8`
    pub fn from_posix(value: &str) -> Option<Self> {
        let language = value.split(['_', '.', '-', '@']).next()?;
        Self::parse(language)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(DEFAULT_LOCALE.to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
