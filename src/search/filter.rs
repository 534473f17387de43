//! Query planning and client-side filtering.
//!
//! The upstream dataset can filter by name or by region, one at a time, and has
//! no language filter at all. [`plan`] picks the server-side query (name wins
//! over region) and [`apply`] narrows the returned records by whatever the
//! server did not already filter.

use super::criteria::SearchCriteria;
use crate::domain::{Country, CountryCode, Region};

/// The query shapes the remote dataset supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteQuery {
    All,
    Name(String),
    Region(Region),
    Codes(Vec<CountryCode>),
}

/// Chooses the server-side query for `criteria`.
///
/// # Examples
///
/// ```
/// use jsonland::search::{plan, RemoteQuery, SearchCriteria};
/// use jsonland::Region;
///
/// let criteria = SearchCriteria {
///     name: "ger".into(),
///     region: Some(Region::Europe),
///     language: String::new(),
/// };
/// assert_eq!(plan(&criteria), RemoteQuery::Name("ger".into()));
/// ```
#[must_use]
pub fn plan(criteria: &SearchCriteria) -> RemoteQuery {
    if !criteria.name.is_empty() {
        RemoteQuery::Name(criteria.name.clone())
    } else if let Some(region) = criteria.region {
        RemoteQuery::Region(region)
    } else {
        RemoteQuery::All
    }
}

/// Applies the criteria the server did not handle for `query`.
#[must_use]
pub fn apply(countries: Vec<Country>, criteria: &SearchCriteria, query: &RemoteQuery) -> Vec<Country> {
    let by_name = matches!(query, RemoteQuery::Name(_));
    let by_region = matches!(query, RemoteQuery::Region(_));

    countries
        .into_iter()
        .filter(|c| criteria.language.is_empty() || c.speaks(&criteria.language))
        .filter(|c| by_name || criteria.name.is_empty() || c.name_contains(&criteria.name))
        .filter(|c| {
            by_region || criteria.region.map_or(true, |r| c.region == r.as_str())
        })
        .collect()
}
