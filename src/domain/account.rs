//! Account domain model.
//!
//! An [`Account`] is a registered user: credentials, a profile photo, and the set
//! of favorite countries. Accounts are keyed by email; the store guarantees at
//! most one account per email.
//!
//! The serialized shape is the flat JSON object kept in the key-value store:
//!
//! ```json
//! {
//!   "username": "alice",
//!   "email": "a@x.com",
//!   "password": "p",
//!   "photo": "data:image/png;base64,...",
//!   "favorites": ["US", "FR"]
//! }
//! ```

use super::code::CountryCode;
use serde::{Deserialize, Deserializer, Serialize};

/// A registered user account.
///
/// `favorites` preserves insertion order and never contains duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,

    /// Unique key across the account collection.
    pub email: String,

    /// Stored and compared in plaintext.
    pub password: String,

    /// Opaque data URI of the profile photo.
    #[serde(default)]
    pub photo: String,

    #[serde(default, deserialize_with = "lenient_favorites")]
    favorites: Vec<CountryCode>,
}

impl Account {
    /// Creates an account with an empty favorites set.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonland::Account;
    ///
    /// let account = Account::new("alice", "a@x.com", "p", "d1");
    /// assert!(account.favorites().is_empty());
    /// ```
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        photo: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            photo: photo.into(),
            favorites: Vec::new(),
        }
    }

    #[must_use]
    pub fn favorites(&self) -> &[CountryCode] {
        &self.favorites
    }

    #[must_use]
    pub fn is_favorite(&self, code: &CountryCode) -> bool {
        self.favorites.contains(code)
    }

    /// Appends `code` unless already present. Returns whether the set changed.
    pub fn add_favorite(&mut self, code: CountryCode) -> bool {
        if self.is_favorite(&code) {
            return false;
        }
        self.favorites.push(code);
        true
    }

    /// Removes `code` if present. Returns whether the set changed.
    pub fn remove_favorite(&mut self, code: &CountryCode) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|c| c != code);
        self.favorites.len() != before
    }

    /// Returns `true` if `email` and `password` both match exactly.
    #[must_use]
    pub fn matches_credentials(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

/// Decodes `favorites` without ever failing the enclosing account.
///
/// A non-array value becomes empty. Elements that are not two-letter codes are
/// dropped (older records may hold three-letter codes) and duplicates collapse.
fn lenient_favorites<'de, D>(deserializer: D) -> Result<Vec<CountryCode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        if !value.is_null() {
            tracing::warn!(value = %value, "favorites is not an array, treating as empty");
        }
        return Ok(Vec::new());
    };

    let mut favorites: Vec<CountryCode> = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str().map(CountryCode::parse) {
            Some(Ok(code)) => {
                if !favorites.contains(&code) {
                    favorites.push(code);
                }
            }
            _ => tracing::warn!(value = %item, "dropping malformed favorite code"),
        }
    }
    Ok(favorites)
}
