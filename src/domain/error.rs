//! Error types for JSON Land.
//!
//! This module defines the centralized error type [`JsonLandError`] and a type alias
//! [`Result`] used throughout the crate. Store-level failures (`DuplicateEmail`,
//! `InvalidCredentials`, `NotLoggedIn`) carry the human-readable message that the
//! form boundary renders inline.

use thiserror::Error;

/// The main error type for JSON Land operations.
///
/// # Examples
///
/// ```
/// use jsonland::JsonLandError;
///
/// let err = JsonLandError::DuplicateEmail;
/// assert_eq!(err.to_string(), "User already exists with this email");
/// ```
#[derive(Debug, Error)]
pub enum JsonLandError {
    /// An account with the requested email is already registered.
    #[error("User already exists with this email")]
    DuplicateEmail,

    /// No account matches the given email and password pair.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// A favorites mutation was attempted with no active session.
    #[error("User not logged in")]
    NotLoggedIn,

    /// A country code was not exactly two ASCII letters.
    #[error("Invalid country code: {0:?}")]
    InvalidCountryCode(String),

    /// A region filter value was not one of the known regions.
    #[error("Unknown region: {0:?}")]
    InvalidRegion(String),

    /// Reading from or writing to the key-value backend failed, or a stored
    /// value could not be decoded.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A request to the remote country dataset failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// A line of user input could not be parsed as a command.
    #[error("{0}")]
    Command(String),

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl JsonLandError {
    /// Returns `true` for the failures a user can cause through the login and
    /// register forms.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::DuplicateEmail | Self::InvalidCredentials | Self::NotLoggedIn
        )
    }
}

/// A specialized `Result` type for JSON Land operations.
pub type Result<T> = std::result::Result<T, JsonLandError>;
