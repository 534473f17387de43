//! Which view currently owns the result area.

use crate::domain::CountryCode;

/// The view the user last asked for.
///
/// Search status updates are only shown while [`View::Search`] is active, so a
/// late fetch does not scroll a favorites list or detail record away.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Search,
    Favorites,
    Detail(CountryCode),
}

impl View {
    #[must_use]
    pub const fn shows_search_results(&self) -> bool {
        matches!(self, Self::Search)
    }
}
