//! Country search and filtering.
//!
//! # Modules
//!
//! - `criteria`: the three persisted filter criteria
//! - `filter`: server-side query planning and client-side narrowing
//! - `source`: the [`CountrySource`] seam and its REST client
//! - `controller`: the debounced [`SearchController`]
//! - `catalog`: favorites and detail lookups

pub mod catalog;
pub mod controller;
pub mod criteria;
pub mod filter;
pub mod source;

pub use catalog::{country_detail, favorite_countries, DetailOutcome, FavoritesOutcome};
pub use controller::{SearchController, SearchStatus, DEFAULT_QUIET_PERIOD};
pub use criteria::SearchCriteria;
pub use filter::{apply, plan, RemoteQuery};
pub use source::{CountrySource, RestCountriesClient, DEFAULT_BASE_URL};
