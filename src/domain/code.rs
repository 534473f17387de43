//! Two-letter country codes.
//!
//! [`CountryCode`] is the element type of an account's favorites. Only ISO
//! alpha-2 style codes (two ASCII letters) are accepted; they are normalized to
//! uppercase so `"us"` and `"US"` name the same favorite.

use super::error::{JsonLandError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated, uppercase, two-letter country code (cca2).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode(String);

impl CountryCode {
    /// Parses a country code, rejecting anything that is not two ASCII letters.
    ///
    /// # Errors
    ///
    /// Returns [`JsonLandError::InvalidCountryCode`] for malformed input.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonland::CountryCode;
    ///
    /// let code = CountryCode::parse("fr").unwrap();
    /// assert_eq!(code.as_str(), "FR");
    /// assert!(CountryCode::parse("FRA").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.len() == 2 && trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(JsonLandError::InvalidCountryCode(raw.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountryCode {
    type Err = JsonLandError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_two_letters_and_uppercases() {
        assert_eq!(CountryCode::parse("us").unwrap().as_str(), "US");
        assert_eq!(CountryCode::parse(" De ").unwrap().as_str(), "DE");
    }

    #[test]
    fn rejects_malformed_codes() {
        for raw in ["", "U", "USA", "1A", "U-", "ÜS"] {
            assert!(
                matches!(CountryCode::parse(raw), Err(JsonLandError::InvalidCountryCode(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn serde_uses_plain_string() {
        let code = CountryCode::parse("JP").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"JP\"");
        assert!(serde_json::from_str::<CountryCode>("\"JPN\"").is_err());
    }
}
