//! Session context: the in-memory view of the current account.
//!
//! [`SessionContext`] wraps a [`UserStore`] for the presentation layer. It holds a
//! cached copy of the current account and refreshes that copy after every
//! mutation, so the cache never disagrees with the store.
//!
//! # Loading
//!
//! The context starts in a loading state. [`SessionContext::load`] reads the
//! session pointer and clears the flag. The read is synchronous today; `load` is
//! `async` so a remote-backed store can slot in without changing callers.
//!
//! # Malformed codes
//!
//! `add_favorite` and `remove_favorite` accept raw strings from the UI. Anything
//! that is not a two-letter code is logged and ignored without reaching the
//! store.

use crate::auth::UserStore;
use crate::domain::error::Result;
use crate::domain::{Account, CountryCode};

#[derive(Debug)]
pub struct SessionContext {
    store: UserStore,
    user: Option<Account>,
    loading: bool,
}

impl SessionContext {
    /// Creates a context in the loading state with no cached account.
    #[must_use]
    pub const fn new(store: UserStore) -> Self {
        Self {
            store,
            user: None,
            loading: true,
        }
    }

    /// Rehydrates the cached account from the store and ends the loading state.
    pub async fn load(&mut self) -> Option<&Account> {
        let _span = tracing::debug_span!("session_load").entered();

        self.loading = true;
        self.user = self.store.current_user();
        self.loading = false;

        tracing::debug!(logged_in = self.user.is_some(), "session loaded");
        self.user.as_ref()
    }

    /// `true` only until the first [`SessionContext::load`] completes.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn user(&self) -> Option<&Account> {
        self.user.as_ref()
    }

    /// Replaces the cached account. The store is not touched.
    pub fn set_user(&mut self, user: Option<Account>) {
        self.user = user;
    }

    #[must_use]
    pub const fn store(&self) -> &UserStore {
        &self.store
    }

    /// Registers through the store and caches the new account.
    ///
    /// # Errors
    ///
    /// Propagates [`UserStore::register`] failures; the cache is unchanged.
    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        photo: &str,
    ) -> Result<&Account> {
        let account = self.store.register(username, email, password, photo)?;
        Ok(self.user.insert(account))
    }

    /// Logs in through the store and caches the account.
    ///
    /// # Errors
    ///
    /// Propagates [`UserStore::login`] failures; the cache is unchanged.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&Account> {
        let account = self.store.login(email, password)?;
        Ok(self.user.insert(account))
    }

    pub fn logout(&mut self) {
        self.store.logout();
        self.user = None;
    }

    /// Adds a favorite by raw code and refreshes the cache.
    ///
    /// A malformed code is logged and ignored.
    ///
    /// # Errors
    ///
    /// Propagates [`UserStore::add_favorite`] failures such as
    /// [`JsonLandError::NotLoggedIn`](crate::JsonLandError::NotLoggedIn).
    pub fn add_favorite(&mut self, raw_code: &str) -> Result<()> {
        let Some(code) = Self::validate(raw_code) else {
            return Ok(());
        };
        let account = self.store.add_favorite(&code)?;
        self.user = Some(account);
        Ok(())
    }

    /// Removes a favorite by raw code and refreshes the cache.
    ///
    /// A malformed code is logged and ignored.
    ///
    /// # Errors
    ///
    /// Propagates [`UserStore::remove_favorite`] failures.
    pub fn remove_favorite(&mut self, raw_code: &str) -> Result<()> {
        let Some(code) = Self::validate(raw_code) else {
            return Ok(());
        };
        let account = self.store.remove_favorite(&code)?;
        self.user = Some(account);
        Ok(())
    }

    /// Flips the favorite state of `raw_code` for the cached account.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn toggle_favorite(&mut self, raw_code: &str) -> Result<()> {
        let is_favorite = CountryCode::parse(raw_code)
            .ok()
            .zip(self.user.as_ref())
            .is_some_and(|(code, user)| user.is_favorite(&code));

        if is_favorite {
            self.remove_favorite(raw_code)
        } else {
            self.add_favorite(raw_code)
        }
    }

    fn validate(raw_code: &str) -> Option<CountryCode> {
        match CountryCode::parse(raw_code) {
            Ok(code) => Some(code),
            Err(e) => {
                tracing::warn!(code = %raw_code, error = %e, "ignoring invalid cca2 code");
                None
            }
        }
    }
}
