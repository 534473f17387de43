//! Remote country dataset.
//!
//! [`CountrySource`] is the seam between the search controller and the network.
//! [`RestCountriesClient`] implements it over HTTP against the REST Countries v3.1
//! API; any service answering the same query shapes can stand in for it.
//!
//! # Endpoints
//!
//! | Query                 | Path                         |
//! |-----------------------|------------------------------|
//! | `RemoteQuery::All`    | `/all?fields=...`            |
//! | `RemoteQuery::Name`   | `/name/{name}?fields=...`    |
//! | `RemoteQuery::Region` | `/region/{region}?fields=...`|
//! | `RemoteQuery::Codes`  | `/alpha?codes=A,B&fields=...`|
//! | detail                | `/alpha/{code}`              |

use super::filter::RemoteQuery;
use crate::domain::error::{JsonLandError, Result};
use crate::domain::{Country, CountryCode};
use futures_util::future::BoxFuture;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Field projection requested for list queries.
const LIST_FIELDS: &str =
    "name,capital,population,flags,region,subregion,languages,currencies,timezones,cca2";

/// A read-only source of country records.
///
/// Futures are `'static` and `Send` so the controller can run them on spawned
/// tasks. Each future resolves exactly once.
pub trait CountrySource: Send + Sync {
    /// Runs a list query. Any non-success HTTP status, 404 included, is an error.
    fn fetch(&self, query: &RemoteQuery) -> BoxFuture<'static, Result<Vec<Country>>>;

    /// Looks up one country with every field. `None` when upstream answers with
    /// an empty body.
    fn detail(&self, code: &CountryCode) -> BoxFuture<'static, Result<Option<Country>>>;
}

/// Upstream bodies are usually arrays but single-record lookups may return an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Country>),
    One(Box<Country>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<Country> {
        match self {
            Self::Many(all) => all,
            Self::One(one) => vec![*one],
        }
    }
}

/// HTTP client for the REST Countries API.
#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    client: reqwest::Client,
    base_url: Url,
}

impl RestCountriesClient {
    /// Creates a client for `base_url`.
    ///
    /// No request timeout is applied unless `timeout` is set; a hung request then
    /// stays pending until the connection drops.
    ///
    /// # Errors
    ///
    /// Returns [`JsonLandError::Config`] if `base_url` is not an absolute
    /// hierarchical URL, or if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| JsonLandError::Config(format!("invalid api base url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(JsonLandError::Config(format!(
                "api base url cannot carry a path: {base_url}"
            )));
        }
        base_url.set_query(None);

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| JsonLandError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Builds the request URL for a list query.
    ///
    /// # Errors
    ///
    /// Fails only if the base URL cannot take path segments, which
    /// [`RestCountriesClient::new`] rules out.
    pub fn list_url(&self, query: &RemoteQuery) -> Result<Url> {
        let mut url = match query {
            RemoteQuery::All => self.endpoint(&["all"])?,
            RemoteQuery::Name(name) => self.endpoint(&["name", name.as_str()])?,
            RemoteQuery::Region(region) => self.endpoint(&["region", region.as_str()])?,
            RemoteQuery::Codes(_) => self.endpoint(&["alpha"])?,
        };

        let query_string = match query {
            RemoteQuery::Codes(codes) => {
                let joined = codes.iter().map(CountryCode::as_str).collect::<Vec<_>>().join(",");
                format!("codes={joined}&fields={LIST_FIELDS}")
            }
            _ => format!("fields={LIST_FIELDS}"),
        };
        url.set_query(Some(&query_string));
        Ok(url)
    }

    /// Builds the request URL for a detail lookup.
    ///
    /// # Errors
    ///
    /// See [`RestCountriesClient::list_url`].
    pub fn detail_url(&self, code: &CountryCode) -> Result<Url> {
        self.endpoint(&["alpha", code.as_str()])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| JsonLandError::Config(format!("invalid api base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// GETs `url` and decodes a country body. Non-2xx statuses are errors.
async fn get_countries(client: reqwest::Client, url: Url) -> Result<Vec<Country>> {
    tracing::debug!(url = %url, "fetching countries");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| JsonLandError::Fetch(format!("request to {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(JsonLandError::Fetch(format!("HTTP {status} for {url}")));
    }

    let body: OneOrMany = response
        .json()
        .await
        .map_err(|e| JsonLandError::Fetch(format!("failed to decode response from {url}: {e}")))?;

    let countries = body.into_vec();
    tracing::debug!(count = countries.len(), "countries fetched");
    Ok(countries)
}

impl CountrySource for RestCountriesClient {
    fn fetch(&self, query: &RemoteQuery) -> BoxFuture<'static, Result<Vec<Country>>> {
        if matches!(query, RemoteQuery::Codes(codes) if codes.is_empty()) {
            return Box::pin(std::future::ready(Ok(Vec::new())));
        }
        let url = match self.list_url(query) {
            Ok(url) => url,
            Err(e) => return Box::pin(std::future::ready(Err(e))),
        };
        let client = self.client.clone();
        Box::pin(get_countries(client, url))
    }

    fn detail(&self, code: &CountryCode) -> BoxFuture<'static, Result<Option<Country>>> {
        let url = match self.detail_url(code) {
            Ok(url) => url,
            Err(e) => return Box::pin(std::future::ready(Err(e))),
        };
        let client = self.client.clone();
        Box::pin(async move {
            Ok(get_countries(client, url).await?.into_iter().next())
        })
    }
}
