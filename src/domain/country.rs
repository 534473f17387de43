//! Country records from the remote dataset.
//!
//! [`Country`] mirrors the projection of the upstream record the application
//! asks for. Every field is optional upstream, so every field defaults; the
//! `*_display` helpers render missing values as `"N/A"`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::JsonLandError;

/// Placeholder rendered for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// The fixed set of regions the region filter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
}

impl Region {
    pub const ALL: [Self; 5] = [
        Self::Africa,
        Self::Americas,
        Self::Asia,
        Self::Europe,
        Self::Oceania,
    ];

    /// The upstream spelling, also used as the persisted value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Africa => "Africa",
            Self::Americas => "Americas",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::Oceania => "Oceania",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = JsonLandError;

    /// Case-insensitive parse of one of the five region names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| JsonLandError::InvalidRegion(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryName {
    #[serde(default)]
    pub common: String,
    #[serde(default)]
    pub official: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub png: String,
    #[serde(default)]
    pub svg: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maps {
    #[serde(default, rename = "googleMaps")]
    pub google_maps: Option<String>,
}

/// A country record as returned by the remote dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Country {
    pub name: CountryName,
    pub capital: Vec<String>,
    pub population: Option<u64>,
    pub flags: Flags,
    pub region: String,
    pub subregion: Option<String>,
    pub languages: BTreeMap<String, String>,
    pub currencies: BTreeMap<String, Currency>,
    pub timezones: Vec<String>,
    pub cca2: String,
    pub cca3: Option<String>,
    pub maps: Maps,
}

impl Country {
    /// Returns `true` if any language name contains `needle`, ignoring case.
    ///
    /// Countries without language data never match.
    #[must_use]
    pub fn speaks(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.languages
            .values()
            .any(|lang| lang.to_lowercase().contains(&needle))
    }

    /// Returns `true` if the common name contains `needle`, ignoring case.
    #[must_use]
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name
            .common
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }

    #[must_use]
    pub fn languages_display(&self) -> String {
        if self.languages.is_empty() {
            return NOT_AVAILABLE.to_string();
        }
        self.languages.values().cloned().collect::<Vec<_>>().join(", ")
    }

    #[must_use]
    pub fn capital_display(&self) -> String {
        if self.capital.is_empty() {
            return NOT_AVAILABLE.to_string();
        }
        self.capital.join(", ")
    }

    /// Currencies as `Name (symbol)`, falling back to the currency key when the
    /// symbol is missing.
    #[must_use]
    pub fn currencies_display(&self) -> String {
        if self.currencies.is_empty() {
            return NOT_AVAILABLE.to_string();
        }
        self.currencies
            .iter()
            .map(|(code, c)| format!("{} ({})", c.name, c.symbol.as_deref().unwrap_or(code)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[must_use]
    pub fn population_display(&self) -> String {
        self.population
            .map_or_else(|| NOT_AVAILABLE.to_string(), group_thousands)
    }
}

/// Formats `n` with comma thousands separators.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
