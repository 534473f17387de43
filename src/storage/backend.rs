//! Key-value storage abstraction.
//!
//! This module defines the [`KeyValueStore`] trait, the durable string-to-string
//! map that both the account store and the search criteria persist into. It is
//! deliberately as small as browser local storage: get, set, remove.
//!
//! # Atomicity
//!
//! Each [`KeyValueStore::set`] or [`KeyValueStore::remove`] is a single atomic
//! overwrite of one key. Two calls are not atomic with respect to each other, so
//! a crash between writing [`keys::USERS`] and [`keys::CURRENT_USER`] can leave
//! the session pointer stale.
//!
//! # Sharing
//!
//! Methods take `&self`. Backends use interior mutability so one instance can be
//! shared as `Arc<dyn KeyValueStore>` by every component of the application.

use crate::domain::error::Result;

/// Well-known keys written by the application.
pub mod keys {
    /// Serialized array of every registered account.
    pub const USERS: &str = "users";

    /// Serialized account of the active session, absent when logged out.
    pub const CURRENT_USER: &str = "currentUser";

    /// Last country-name search text.
    pub const LAST_SEARCH: &str = "lastSearch";

    /// Last region filter, empty for "all regions".
    pub const LAST_REGION: &str = "lastRegion";

    /// Last language search text.
    pub const LAST_LANGUAGE_SEARCH: &str = "lastLanguageSearch";
}

/// Durable string key-value storage.
///
/// # Implementations
///
/// - [`JsonFileStore`](crate::storage::JsonFileStore): one JSON file, atomic rewrite per write
/// - [`MemoryStore`](crate::storage::MemoryStore): process-local map
///
/// # Examples
///
/// ```
/// use jsonland::storage::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::default();
/// store.set("lastSearch", "swi")?;
/// assert_eq!(store.get("lastSearch")?.as_deref(), Some("swi"));
/// store.remove("lastSearch")?;
/// assert!(store.get("lastSearch")?.is_none());
/// # Ok::<(), jsonland::JsonLandError>(())
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be persisted.
    fn remove(&self, key: &str) -> Result<()>;
}
