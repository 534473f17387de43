//! One-shot lookups outside the debounced search: the favorites list and the
//! country detail view.

use super::filter::RemoteQuery;
use super::source::CountrySource;
use crate::domain::{Account, Country, CountryCode};

pub const FAVORITES_FAILED_MESSAGE: &str = "Failed to fetch favorite countries.";
pub const DETAIL_NOT_FOUND_MESSAGE: &str = "Country data not found.";
pub const DETAIL_FAILED_MESSAGE: &str = "Failed to load country details.";

/// Outcome of resolving an account's favorites to country records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesOutcome {
    Loaded(Vec<Country>),
    Failed,
}

impl FavoritesOutcome {
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Loaded(_) => None,
            Self::Failed => Some(FAVORITES_FAILED_MESSAGE),
        }
    }
}

/// Outcome of a country detail lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Found(Box<Country>),
    NotFound,
    Failed,
}

impl DetailOutcome {
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Found(_) => None,
            Self::NotFound => Some(DETAIL_NOT_FOUND_MESSAGE),
            Self::Failed => Some(DETAIL_FAILED_MESSAGE),
        }
    }
}

/// Fetches the records for every favorite of `account` in one batch request.
///
/// An account without favorites resolves to an empty list without a request.
pub async fn favorite_countries(source: &dyn CountrySource, account: &Account) -> FavoritesOutcome {
    if account.favorites().is_empty() {
        return FavoritesOutcome::Loaded(Vec::new());
    }

    let query = RemoteQuery::Codes(account.favorites().to_vec());
    match source.fetch(&query).await {
        Ok(countries) => FavoritesOutcome::Loaded(countries),
        Err(e) => {
            tracing::error!(error = %e, "error fetching favorite countries");
            FavoritesOutcome::Failed
        }
    }
}

/// Looks up the full record of one country.
pub async fn country_detail(source: &dyn CountrySource, code: &CountryCode) -> DetailOutcome {
    match source.detail(code).await {
        Ok(Some(country)) => DetailOutcome::Found(Box::new(country)),
        Ok(None) => DetailOutcome::NotFound,
        Err(e) => {
            tracing::error!(code = %code, error = %e, "error fetching country detail");
            DetailOutcome::Failed
        }
    }
}
