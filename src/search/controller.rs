//! Debounced search controller.
//!
//! [`SearchController`] owns the current [`SearchCriteria`], persists every change,
//! and turns bursts of changes into a single remote fetch once input has been
//! quiet for the configured period. Outcomes are published as [`SearchStatus`]
//! values on a `tokio::sync::watch` channel.
//!
//! # Debounce
//!
//! ```text
//! change ─┐ change ─┐ change ─┐
//!         ▼         ▼         ▼
//!   [abort+schedule] ... [abort+schedule] ──quiet period──▶ fetch
//! ```
//!
//! Each change aborts the pending task and schedules a new one. `submit` aborts
//! the pending task and fetches immediately. Every fetch carries a generation
//! number; a fetch whose generation is no longer current discards its outcome,
//! so only the most recently issued fetch is ever visible.
//!
//! No timeout is applied here. A hung request leaves the status at `Loading`
//! until a newer fetch supersedes it.

use super::criteria::SearchCriteria;
use super::filter::{apply, plan};
use super::source::CountrySource;
use crate::domain::error::{JsonLandError, Result};
use crate::domain::{Country, Region};
use crate::storage::KeyValueStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Quiet period between the last criterion change and the fetch.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Shown when filtering leaves nothing.
pub const NO_RESULTS_MESSAGE: &str = "No countries found matching your criteria.";

/// Shown when the remote fetch fails.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch countries.";

/// Observable state of the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// Nothing fetched yet, or a previous error was cleared by new input.
    Idle,
    Loading,
    Ready(Vec<Country>),
    NoResults,
    /// The fetch failed; the result set is cleared.
    FetchFailed,
}

impl SearchStatus {
    /// The user-visible status line, if this state has one.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::NoResults => Some(NO_RESULTS_MESSAGE),
            Self::FetchFailed => Some(FETCH_FAILED_MESSAGE),
            Self::Idle | Self::Loading | Self::Ready(_) => None,
        }
    }

    #[must_use]
    pub fn countries(&self) -> &[Country] {
        match self {
            Self::Ready(countries) => countries,
            _ => &[],
        }
    }

    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::NoResults | Self::FetchFailed)
    }
}

/// Criteria owner and debounced fetch scheduler.
pub struct SearchController {
    kv: Arc<dyn KeyValueStore>,
    source: Arc<dyn CountrySource>,
    criteria: SearchCriteria,
    quiet_period: Duration,
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
    status: Arc<watch::Sender<SearchStatus>>,
}

impl SearchController {
    /// Creates a controller with criteria restored from `kv`.
    ///
    /// Nothing is fetched until a criterion changes or [`SearchController::submit`]
    /// is called.
    ///
    /// # Errors
    ///
    /// - [`JsonLandError::Config`] when called outside a Tokio runtime
    /// - storage errors from restoring criteria
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        source: Arc<dyn CountrySource>,
        quiet_period: Duration,
    ) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| JsonLandError::Config(format!("search requires a Tokio runtime: {e}")))?;
        let criteria = SearchCriteria::restore(kv.as_ref())?;
        tracing::debug!(?criteria, "restored search criteria");

        let (status, _) = watch::channel(SearchStatus::Idle);

        Ok(Self {
            kv,
            source,
            criteria,
            quiet_period,
            runtime,
            pending: None,
            generation: Arc::new(AtomicU64::new(0)),
            status: Arc::new(status),
        })
    }

    #[must_use]
    pub const fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    /// Subscribes to status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchStatus> {
        self.status.subscribe()
    }

    #[must_use]
    pub fn status(&self) -> SearchStatus {
        self.status.borrow().clone()
    }

    /// `true` while a scheduled or in-flight fetch task is alive.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Sets the name substring and schedules a fetch.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the criterion cannot be persisted; the fetch is
    /// scheduled regardless.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.criteria.name = name.into();
        self.on_change()
    }

    /// Sets or clears the region filter and schedules a fetch.
    ///
    /// # Errors
    ///
    /// See [`SearchController::set_name`].
    pub fn set_region(&mut self, region: Option<Region>) -> Result<()> {
        self.criteria.region = region;
        self.on_change()
    }

    /// Sets the language substring and schedules a fetch.
    ///
    /// # Errors
    ///
    /// See [`SearchController::set_name`].
    pub fn set_language(&mut self, language: impl Into<String>) -> Result<()> {
        self.criteria.language = language.into();
        self.on_change()
    }

    /// Cancels any scheduled fetch and fetches right away.
    pub fn submit(&mut self) {
        let _span = tracing::debug_span!("search_submit").entered();
        self.spawn_fetch(None);
    }

    /// Aborts the scheduled or in-flight fetch, if any. No status is published.
    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            // outcome of an already running fetch must not land
            self.generation.fetch_add(1, Ordering::SeqCst);
            tracing::trace!("pending fetch cancelled");
        }
    }

    fn on_change(&mut self) -> Result<()> {
        let persisted = self.criteria.persist(self.kv.as_ref());
        if let Err(e) = &persisted {
            tracing::warn!(error = %e, "failed to persist search criteria");
        }

        self.status.send_if_modified(|status| {
            if matches!(status, SearchStatus::NoResults | SearchStatus::FetchFailed) {
                *status = SearchStatus::Idle;
                true
            } else {
                false
            }
        });

        self.spawn_fetch(Some(self.quiet_period));
        persisted
    }

    fn spawn_fetch(&mut self, delay: Option<Duration>) {
        self.cancel_pending();

        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let source = Arc::clone(&self.source);
        let criteria = self.criteria.clone();
        let generation = Arc::clone(&self.generation);
        let status = Arc::clone(&self.status);

        tracing::debug!(generation = id, ?delay, "scheduling fetch");

        let task = async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            run_fetch(source.as_ref(), &criteria, id, &generation, &status).await;
        };
        self.pending = Some(
            self.runtime
                .spawn(task.instrument(tracing::debug_span!("search_fetch", generation = id))),
        );
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("criteria", &self.criteria)
            .field("quiet_period", &self.quiet_period)
            .field("has_pending", &self.has_pending())
            .finish_non_exhaustive()
    }
}

/// Runs one fetch and publishes its outcome if `id` is still current.
async fn run_fetch(
    source: &dyn CountrySource,
    criteria: &SearchCriteria,
    id: u64,
    generation: &AtomicU64,
    status: &watch::Sender<SearchStatus>,
) {
    let query = plan(criteria);
    tracing::debug!(?query, "fetching");

    if !publish_if_current(status, generation, id, SearchStatus::Loading) {
        return;
    }
    let result = source.fetch(&query).await;

    let next = match result {
        Ok(countries) => {
            let filtered = apply(countries, criteria, &query);
            tracing::debug!(count = filtered.len(), "fetch complete");
            if filtered.is_empty() {
                SearchStatus::NoResults
            } else {
                SearchStatus::Ready(filtered)
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "error fetching countries");
            SearchStatus::FetchFailed
        }
    };
    publish_if_current(status, generation, id, next);
}

/// Writes `next` only while `id` is the latest generation. The check and the
/// write happen under the channel lock, so a newer fetch cannot interleave.
fn publish_if_current(
    status: &watch::Sender<SearchStatus>,
    generation: &AtomicU64,
    id: u64,
    next: SearchStatus,
) -> bool {
    let published = status.send_if_modified(|current| {
        if generation.load(Ordering::SeqCst) != id {
            return false;
        }
        *current = next;
        true
    });
    if !published {
        tracing::debug!("discarding superseded fetch");
    }
    published
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::RemoteQuery;
    use crate::storage::{keys, MemoryStore};
    use futures_util::future::BoxFuture;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSource {
        countries: Vec<Country>,
        fail: bool,
        latency: Duration,
        calls: AtomicUsize,
        queries: Mutex<Vec<RemoteQuery>>,
    }

    impl FakeSource {
        fn with(countries: Vec<Country>) -> Self {
            Self {
                countries,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_query(&self) -> Option<RemoteQuery> {
            self.queries.lock().unwrap().last().cloned()
        }
    }

    impl CountrySource for FakeSource {
        fn fetch(&self, query: &RemoteQuery) -> BoxFuture<'static, Result<Vec<Country>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());
            let result = if self.fail {
                Err(JsonLandError::Fetch("connection refused".to_string()))
            } else if let RemoteQuery::Region(region) = query {
                Ok(self
                    .countries
                    .iter()
                    .filter(|c| c.region == region.as_str())
                    .cloned()
                    .collect())
            } else {
                Ok(self.countries.clone())
            };
            let latency = self.latency;
            Box::pin(async move {
                if !latency.is_zero() {
                    tokio::time::sleep(latency).await;
                }
                result
            })
        }

        fn detail(
            &self,
            _code: &crate::domain::CountryCode,
        ) -> BoxFuture<'static, Result<Option<Country>>> {
            Box::pin(std::future::ready(Ok(None)))
        }
    }

    fn country(name: &str, region: &str, language: &str) -> Country {
        let mut c = Country::default();
        c.name.common = name.to_string();
        c.region = region.to_string();
        c.languages.insert("l0".to_string(), language.to_string());
        c
    }

    fn dataset() -> Vec<Country> {
        vec![
            country("Germany", "Europe", "German"),
            country("France", "Europe", "French"),
            country("Japan", "Asia", "Japanese"),
        ]
    }

    fn controller(kv: &Arc<MemoryStore>, source: &Arc<FakeSource>) -> SearchController {
        let kv: Arc<dyn KeyValueStore> = kv.clone();
        let source: Arc<dyn CountrySource> = source.clone();
        SearchController::new(kv, source, DEFAULT_QUIET_PERIOD).unwrap()
    }

    async fn settled(rx: &mut watch::Receiver<SearchStatus>) -> SearchStatus {
        rx.wait_for(SearchStatus::is_settled).await.unwrap().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_changes_coalesce_into_one_fetch() {
        let kv = Arc::new(MemoryStore::default());
        let source = Arc::new(FakeSource::with(dataset()));
        let mut search = controller(&kv, &source);
        let mut rx = search.subscribe();

        for name in ["g", "ge", "ger"] {
            search.set_name(name).unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(source.calls(), 0);

        settled(&mut rx).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(source.last_query(), Some(RemoteQuery::Name("ger".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fetched_before_quiet_period() {
        let kv = Arc::new(MemoryStore::default());
        let source = Arc::new(FakeSource::with(dataset()));
        let mut search = controller(&kv, &source);

        search.set_language("fr").unwrap();
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(source.calls(), 0);
        assert!(search.has_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_fetches_immediately_and_cancels_pending() {
        let kv = Arc::new(MemoryStore::default());
        let source = Arc::new(FakeSource::with(dataset()));
        let mut search = controller(&kv, &source);
        let mut rx = search.subscribe();

        search.set_region(Some(Region::Asia)).unwrap();
        search.submit();

        let status = settled(&mut rx).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(source.last_query(), Some(RemoteQuery::Region(Region::Asia)));
        assert_eq!(status.countries().len(), 1);
        assert_eq!(status.countries()[0].name.common, "Japan");

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn language_filter_is_applied_locally() {
        let kv = Arc::new(MemoryStore::default());
        let source = Arc::new(FakeSource::with(dataset()));
        let mut search = controller(&kv, &source);
        let mut rx = search.subscribe();

        search.set_language("FRENCH").unwrap();
        let status = settled(&mut rx).await;

        assert_eq!(source.last_query(), Some(RemoteQuery::All));
        let names: Vec<_> = status.countries().iter().map(|c| c.name.common.as_str()).collect();
        assert_eq!(names, ["France"]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_reports_no_results() {
        let kv = Arc::new(MemoryStore::default());
        let source = Arc::new(FakeSource::with(dataset()));
        let mut search = controller(&kv, &source);
        let mut rx = search.subscribe();

        search.set_language("klingon").unwrap();
        let status = settled(&mut rx).await;
        assert_eq!(status, SearchStatus::NoResults);
        assert_eq!(status.message(), Some(NO_RESULTS_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_clears_results_until_next_change() {
        let kv = Arc::new(MemoryStore::default());
        let source = Arc::new(FakeSource {
            fail: true,
            ..FakeSource::default()
        });
        let mut search = controller(&kv, &source);
        let mut rx = search.subscribe();

        search.submit();
        let status = settled(&mut rx).await;
        assert_eq!(status, SearchStatus::FetchFailed);
        assert!(status.countries().is_empty());
        assert_eq!(status.message(), Some(FETCH_FAILED_MESSAGE));

        search.set_name("x").unwrap();
        assert_eq!(search.status(), SearchStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn changes_are_persisted_immediately() {
        let kv = Arc::new(MemoryStore::default());
        let source = Arc::new(FakeSource::with(dataset()));
        let mut search = controller(&kv, &source);

        search.set_name("uni").unwrap();
        search.set_region(Some(Region::Europe)).unwrap();
        search.set_language("span").unwrap();

        assert_eq!(kv.get(keys::LAST_SEARCH).unwrap().as_deref(), Some("uni"));
        assert_eq!(kv.get(keys::LAST_REGION).unwrap().as_deref(), Some("Europe"));
        assert_eq!(kv.get(keys::LAST_LANGUAGE_SEARCH).unwrap().as_deref(), Some("span"));

        search.set_region(None).unwrap();
        assert_eq!(kv.get(keys::LAST_REGION).unwrap().as_deref(), Some(""));

        drop(search);
        let restored = controller(&kv, &source);
        assert_eq!(restored.criteria().name, "uni");
        assert_eq!(restored.criteria().region, None);
        assert_eq!(restored.criteria().language, "span");
    }

    #[test]
    fn stale_generation_cannot_write_status() {
        let (status, rx) = watch::channel(SearchStatus::Idle);
        let generation = AtomicU64::new(2);

        assert!(!publish_if_current(&status, &generation, 1, SearchStatus::Loading));
        assert_eq!(*rx.borrow(), SearchStatus::Idle);
        assert!(!publish_if_current(&status, &generation, 1, SearchStatus::FetchFailed));
        assert_eq!(*rx.borrow(), SearchStatus::Idle);

        assert!(publish_if_current(&status, &generation, 2, SearchStatus::NoResults));
        assert_eq!(*rx.borrow(), SearchStatus::NoResults);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_fetch_never_publishes() {
        let kv = Arc::new(MemoryStore::default());
        let source = Arc::new(FakeSource {
            countries: dataset(),
            latency: Duration::from_secs(1),
            ..FakeSource::default()
        });
        let mut search = controller(&kv, &source);
        let mut rx = search.subscribe();

        search.submit();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(search.status(), SearchStatus::Loading);

        search.set_name("jap").unwrap();
        search.submit();

        // first fetch would have completed at 1s
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(search.status(), SearchStatus::Loading);

        let status = settled(&mut rx).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(source.last_query(), Some(RemoteQuery::Name("jap".to_string())));
        assert_eq!(status.countries().len(), 3);
    }
}
