//! Search criteria and their persistence.
//!
//! The three criteria are independent and each one is written back to the
//! key-value store as soon as it changes, so a restart restores the last query.

use crate::domain::error::Result;
use crate::domain::Region;
use crate::storage::{keys, KeyValueStore};

/// Name substring, exact region, and language substring.
///
/// Empty strings and `None` mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub name: String,
    pub region: Option<Region>,
    pub language: String,
}

impl SearchCriteria {
    /// Reads the last persisted criteria.
    ///
    /// Missing keys and unknown region names fall back to "no constraint".
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn restore(kv: &dyn KeyValueStore) -> Result<Self> {
        let name = kv.get(keys::LAST_SEARCH)?.unwrap_or_default();
        let language = kv.get(keys::LAST_LANGUAGE_SEARCH)?.unwrap_or_default();
        let region = kv
            .get(keys::LAST_REGION)?
            .filter(|r| !r.trim().is_empty())
            .and_then(|r| match r.parse::<Region>() {
                Ok(region) => Some(region),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring persisted region");
                    None
                }
            });

        Ok(Self {
            name,
            region,
            language,
        })
    }

    /// Writes all three criteria.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails.
    pub fn persist(&self, kv: &dyn KeyValueStore) -> Result<()> {
        kv.set(keys::LAST_SEARCH, &self.name)?;
        kv.set(
            keys::LAST_REGION,
            self.region.map_or("", Region::as_str),
        )?;
        kv.set(keys::LAST_LANGUAGE_SEARCH, &self.language)
    }

    /// `true` when no criterion constrains the result set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.region.is_none() && self.language.is_empty()
    }
}
