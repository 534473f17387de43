//! Central application state.
//!
//! [`AppState`] bundles the session, the search controller, and the country
//! source behind one owner so the event handler can reach all three.

use crate::app::modes::View;
use crate::auth::UserStore;
use crate::domain::error::Result;
use crate::search::{CountrySource, SearchController};
use crate::session::SessionContext;
use crate::storage::KeyValueStore;
use crate::ui;
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub session: SessionContext,
    pub search: SearchController,
    pub view: View,
    source: Arc<dyn CountrySource>,
}

impl AppState {
    /// Builds the state over `kv`, restores the session, and starts the first
    /// search with the persisted criteria.
    ///
    /// # Errors
    ///
    /// Propagates [`SearchController::new`] failures.
    pub async fn start(
        kv: Arc<dyn KeyValueStore>,
        source: Arc<dyn CountrySource>,
        quiet_period: Duration,
    ) -> Result<Self> {
        let mut session = SessionContext::new(UserStore::new(Arc::clone(&kv)));
        session.load().await;

        let mut search = SearchController::new(kv, Arc::clone(&source), quiet_period)?;
        search.submit();

        tracing::info!(
            logged_in = session.user().is_some(),
            criteria = ?search.criteria(),
            "application started"
        );

        Ok(Self {
            session,
            search,
            view: View::default(),
            source,
        })
    }

    #[must_use]
    pub fn source(&self) -> &dyn CountrySource {
        self.source.as_ref()
    }

    /// Text for the current search status, or `None` when another view owns
    /// the result area.
    #[must_use]
    pub fn search_text(&self) -> Option<String> {
        if !self.view.shows_search_results() {
            return None;
        }
        let text = ui::render_status(&self.search.status(), self.session.user());
        (!text.is_empty()).then_some(text)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("session", &self.session)
            .field("search", &self.search)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}
