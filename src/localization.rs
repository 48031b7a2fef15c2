//! Content localization requested from services.

use serde::{Deserialize, Serialize};

/// Language and optional country that services should localize responses for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Localization {
    /// ISO 639 language code, e.g. `en`.
    pub language: String,
    /// ISO 3166 country code, e.g. `GB`.
    #[serde(default)]
    pub country: Option<String>,
}

impl Localization {
    /// Creates a localization from a language and optional country code.
    #[must_use]
    pub fn new(language: impl Into<String>, country: Option<&str>) -> Self {
        Self {
            language: language.into(),
            country: country.map(str::to_string),
        }
    }

    /// Returns the BCP 47 tag, e.g. `en-GB`, or just the language.
    #[must_use]
    pub fn language_tag(&self) -> String {
        match &self.country {
            Some(country) => format!("{}-{country}", self.language),
            None => self.language.clone(),
        }
    }

    /// Returns true when the language is English, in any region.
    #[must_use]
    pub fn is_english(&self) -> bool {
        let language = self.language.trim();
        language.eq_ignore_ascii_case("en")
            || language
                .get(..3)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("en-"))
    }

    /// Returns an `Accept-Language` header value preferring the full tag.
    #[must_use]
    pub fn accept_language(&self) -> String {
        match &self.country {
            Some(_) => format!("{}, {};q=0.9", self.language_tag(), self.language),
            None => self.language.clone(),
        }
    }
}

impl Default for Localization {
    fn default() -> Self {
        Self::new("en", Some("GB"))
    }
}
