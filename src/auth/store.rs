//! Local user store.
//!
//! [`UserStore`] owns the account collection and the session pointer, both kept
//! as JSON strings in a [`KeyValueStore`]. There is no real authentication here:
//! passwords are stored and compared in plaintext.
//!
//! # Read-modify-write
//!
//! Every mutation loads the full collection, replaces the account by email,
//! persists the collection, then persists the session pointer as a copy of the
//! updated account. Nothing guards the cycle against a second writer; with more
//! than one process sharing a backend the last write wins.

use crate::domain::error::{JsonLandError, Result};
use crate::domain::{Account, CountryCode};
use crate::storage::{keys, KeyValueStore};
use std::sync::Arc;

/// Account collection and session pointer over a shared key-value backend.
#[derive(Clone)]
pub struct UserStore {
    kv: Arc<dyn KeyValueStore>,
}

impl UserStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Registers a new account and makes it the current session.
    ///
    /// # Errors
    ///
    /// - [`JsonLandError::DuplicateEmail`] if the email is already registered
    /// - [`JsonLandError::Storage`] if the collection cannot be read or written
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonland::auth::UserStore;
    /// use jsonland::storage::MemoryStore;
    /// use std::sync::Arc;
    ///
    /// let store = UserStore::new(Arc::new(MemoryStore::default()));
    /// let account = store.register("alice", "a@x.com", "p", "d1")?;
    /// assert!(account.favorites().is_empty());
    /// assert_eq!(store.current_user(), Some(account));
    /// # Ok::<(), jsonland::JsonLandError>(())
    /// ```
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        photo: &str,
    ) -> Result<Account> {
        let _span = tracing::debug_span!("register", email = %email).entered();

        let mut accounts = self.load_accounts()?;
        if accounts.iter().any(|a| a.email == email) {
            tracing::debug!("email already registered");
            return Err(JsonLandError::DuplicateEmail);
        }

        let account = Account::new(username, email, password, photo);
        accounts.push(account.clone());
        self.save_accounts(&accounts)?;
        self.save_session(&account)?;

        tracing::debug!(total_accounts = accounts.len(), "account registered");
        Ok(account)
    }

    /// Logs in with an exact email and password match.
    ///
    /// # Errors
    ///
    /// - [`JsonLandError::InvalidCredentials`] if no account matches both fields
    /// - [`JsonLandError::Storage`] if the collection cannot be read or the
    ///   session cannot be written
    pub fn login(&self, email: &str, password: &str) -> Result<Account> {
        let _span = tracing::debug_span!("login", email = %email).entered();

        let account = self
            .load_accounts()?
            .into_iter()
            .find(|a| a.matches_credentials(email, password))
            .ok_or(JsonLandError::InvalidCredentials)?;

        self.save_session(&account)?;
        tracing::debug!("logged in");
        Ok(account)
    }

    /// Clears the session pointer. The account collection is untouched.
    ///
    /// A backend failure is logged rather than returned.
    pub fn logout(&self) {
        let _span = tracing::debug_span!("logout").entered();

        if let Err(e) = self.kv.remove(keys::CURRENT_USER) {
            tracing::error!(error = %e, "failed to clear session pointer");
        }
    }

    /// Returns the session's account, or `None` when logged out.
    ///
    /// Never fails: an unreadable or undecodable pointer is logged and treated as
    /// logged out. Favorites are normalized during decoding.
    #[must_use]
    pub fn current_user(&self) -> Option<Account> {
        let raw = match self.kv.get(keys::CURRENT_USER) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session pointer");
                return None;
            }
        };

        match serde_json::from_str::<Account>(&raw) {
            Ok(account) => Some(account),
            Err(e) => {
                tracing::warn!(error = %e, "session pointer is not a valid account");
                None
            }
        }
    }

    /// Adds `code` to the current account's favorites.
    ///
    /// Idempotent: adding a code already present persists nothing and returns
    /// the account unchanged.
    ///
    /// # Errors
    ///
    /// - [`JsonLandError::NotLoggedIn`] if there is no current session
    /// - [`JsonLandError::Storage`] if persisting fails
    pub fn add_favorite(&self, code: &CountryCode) -> Result<Account> {
        let _span = tracing::debug_span!("add_favorite", code = %code).entered();

        let mut account = self.current_user().ok_or(JsonLandError::NotLoggedIn)?;
        if account.add_favorite(code.clone()) {
            self.update_account(&account)?;
            tracing::debug!(favorites = account.favorites().len(), "favorite added");
        } else {
            tracing::debug!("already a favorite");
        }
        Ok(account)
    }

    /// Removes `code` from the current account's favorites and persists.
    ///
    /// Removing a code that is not present leaves the favorites unchanged.
    ///
    /// # Errors
    ///
    /// - [`JsonLandError::NotLoggedIn`] if there is no current session
    /// - [`JsonLandError::Storage`] if persisting fails
    pub fn remove_favorite(&self, code: &CountryCode) -> Result<Account> {
        let _span = tracing::debug_span!("remove_favorite", code = %code).entered();

        let mut account = self.current_user().ok_or(JsonLandError::NotLoggedIn)?;
        let removed = account.remove_favorite(code);
        self.update_account(&account)?;

        tracing::debug!(removed, favorites = account.favorites().len(), "favorite removal persisted");
        Ok(account)
    }

    /// Returns every registered account.
    ///
    /// # Errors
    ///
    /// Returns [`JsonLandError::Storage`] if the collection cannot be decoded.
    pub fn accounts(&self) -> Result<Vec<Account>> {
        self.load_accounts()
    }

    /// Replaces the account with the same email in the collection, then rewrites
    /// the session pointer.
    ///
    /// An account missing from the collection only updates the session pointer.
    fn update_account(&self, updated: &Account) -> Result<()> {
        let mut accounts = self.load_accounts()?;
        if let Some(slot) = accounts.iter_mut().find(|a| a.email == updated.email) {
            slot.clone_from(updated);
            self.save_accounts(&accounts)?;
        } else {
            tracing::warn!(email = %updated.email, "session account missing from collection");
        }
        self.save_session(updated)
    }

    fn load_accounts(&self) -> Result<Vec<Account>> {
        let Some(raw) = self.kv.get(keys::USERS)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw)
            .map_err(|e| JsonLandError::Storage(format!("failed to decode accounts: {e}")))
    }

    fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        let json = serde_json::to_string(accounts)
            .map_err(|e| JsonLandError::Storage(format!("failed to encode accounts: {e}")))?;
        self.kv.set(keys::USERS, &json)
    }

    fn save_session(&self, account: &Account) -> Result<()> {
        let json = serde_json::to_string(account)
            .map_err(|e| JsonLandError::Storage(format!("failed to encode session: {e}")))?;
        self.kv.set(keys::CURRENT_USER, &json)
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, UserStore) {
        let kv = Arc::new(MemoryStore::default());
        let store = UserStore::new(kv.clone());
        (kv, store)
    }

    fn code(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (_, store) = store();
        store.register("testuser", "test@example.com", "password", "b64").unwrap();

        let err = store
            .register("testuser2", "test@example.com", "password2", "b64-2")
            .unwrap_err();
        assert!(matches!(err, JsonLandError::DuplicateEmail));
        assert_eq!(store.accounts().unwrap().len(), 1);
    }

    #[test]
    fn login_requires_exact_pair() {
        let (_, store) = store();
        let registered = store.register("u", "u@x.com", "secret", "d").unwrap();
        store.logout();

        assert!(matches!(store.login("u@x.com", "wrong"), Err(JsonLandError::InvalidCredentials)));
        assert!(matches!(store.login("U@x.com", "secret"), Err(JsonLandError::InvalidCredentials)));
        assert!(store.current_user().is_none());

        let account = store.login("u@x.com", "secret").unwrap();
        assert_eq!(account, registered);
        assert_eq!(store.current_user(), Some(account));
    }

    #[test]
    fn login_with_no_accounts_fails() {
        let (_, store) = store();
        assert!(matches!(store.login("a@x.com", "p"), Err(JsonLandError::InvalidCredentials)));
    }

    #[test]
    fn logout_keeps_collection() {
        let (kv, store) = store();
        store.register("u", "u@x.com", "p", "d").unwrap();
        let users_before = kv.get(keys::USERS).unwrap();

        store.logout();

        assert!(store.current_user().is_none());
        assert_eq!(kv.get(keys::USERS).unwrap(), users_before);
    }

    #[test]
    fn favorites_require_session() {
        let (_, store) = store();
        assert!(matches!(store.add_favorite(&code("US")), Err(JsonLandError::NotLoggedIn)));
        assert!(matches!(store.remove_favorite(&code("US")), Err(JsonLandError::NotLoggedIn)));
    }

    #[test]
    fn favorites_write_through_to_collection_and_session() {
        let (_, store) = store();
        store.register("u", "u@x.com", "p", "d").unwrap();

        store.add_favorite(&code("US")).unwrap();
        let account = store.add_favorite(&code("US")).unwrap();
        assert_eq!(account.favorites(), &[code("US")]);
        assert_eq!(store.current_user().unwrap().favorites(), &[code("US")]);
        assert_eq!(store.accounts().unwrap()[0].favorites(), &[code("US")]);

        store.logout();
        let again = store.login("u@x.com", "p").unwrap();
        assert_eq!(again.favorites(), &[code("US")]);
    }

    #[test]
    fn remove_missing_favorite_returns_account_unchanged() {
        let (_, store) = store();
        store.register("u", "u@x.com", "p", "d").unwrap();
        let with_fr = store.add_favorite(&code("FR")).unwrap();

        let after = store.remove_favorite(&code("US")).unwrap();
        assert_eq!(after, with_fr);
    }

    #[test]
    fn current_user_tolerates_garbage() {
        let (kv, store) = store();
        kv.set(keys::CURRENT_USER, "not json").unwrap();
        assert!(store.current_user().is_none());
    }

    #[test]
    fn current_user_normalizes_missing_favorites() {
        let (kv, store) = store();
        kv.set(
            keys::CURRENT_USER,
            r#"{"username":"testuser","email":"test@example.com","password":"p"}"#,
        )
        .unwrap();

        let account = store.current_user().unwrap();
        assert_eq!(account.username, "testuser");
        assert!(account.favorites().is_empty());
    }

    #[test]
    fn corrupt_collection_is_surfaced() {
        let (kv, store) = store();
        kv.set(keys::USERS, "{").unwrap();
        assert!(matches!(
            store.register("u", "u@x.com", "p", "d"),
            Err(JsonLandError::Storage(_))
        ));
    }
}
