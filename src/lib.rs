//! JSON Land: local accounts, country favorites, and debounced country search.
//!
//! JSON Land keeps a small set of user accounts in a local key-value store,
//! tracks which account is logged in, lets that account collect favorite
//! countries, and searches the REST Countries dataset by name, region, and
//! language.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal shell (main.rs)                           │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/, forms)                    │
//! │  - Command parsing and dispatch                     │
//! │  - Form validation, inline error messages           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Session/Auth  │   │ Search        │
//! │ (ui/)         │   │ (session/,    │   │ (search/)     │
//! │ - Plain text  │   │  auth/)       │   │ - Debounce    │
//! │               │   │ - Accounts    │   │ - HTTP client │
//! │               │   │ - Favorites   │   │ - Filtering   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                              │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage (storage/) and Domain (domain/)            │
//! │  - Key-value backends (JSON file, memory)           │
//! │  - Accounts, country codes, countries, errors       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Command events, dispatch, and output actions
//! - [`auth`]: The local user store
//! - [`domain`]: Core domain types (accounts, codes, countries, errors)
//! - [`forms`]: Login and registration forms
//! - [`infrastructure`]: Filesystem locations
//! - [`search`]: Criteria, remote source, debounced controller
//! - [`session`]: In-memory view of the current account
//! - [`storage`]: Key-value persistence
//! - [`ui`]: Plain-text rendering
//! - [`observability`]: OpenTelemetry tracing
//!
//! # Configuration
//!
//! The binary takes an optional TOML file path as its only argument:
//!
//! ```toml
//! data_dir = "~/.local/share/jsonland"
//! api_base_url = "https://restcountries.com/v3.1"
//! debounce_ms = 300
//! request_timeout_secs = 10
//! trace_level = "debug"
//! ```
//!
//! Every key is optional. Unknown keys are rejected.
//!
//! # Example
//!
//! ```rust
//! use jsonland::auth::UserStore;
//! use jsonland::storage::MemoryStore;
//! use jsonland::CountryCode;
//! use std::sync::Arc;
//!
//! let store = UserStore::new(Arc::new(MemoryStore::default()));
//! store.register("alice", "a@x.com", "p", "data:image/png;base64,AA==")?;
//! let alice = store.add_favorite(&CountryCode::parse("no")?)?;
//! assert_eq!(alice.favorites()[0].as_str(), "NO");
//! # Ok::<(), jsonland::JsonLandError>(())
//! ```

pub mod app;
pub mod auth;
pub mod domain;
pub mod forms;
pub mod infrastructure;
pub mod observability;
pub mod search;
pub mod session;
pub mod storage;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event, View};
pub use domain::{Account, Country, CountryCode, JsonLandError, Region, Result};

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime configuration, read from TOML.
///
/// # Example
///
/// ```rust
/// use jsonland::Config;
/// use std::time::Duration;
///
/// let config = Config::from_toml("debounce_ms = 150")?;
/// assert_eq!(config.quiet_period(), Duration::from_millis(150));
/// assert_eq!(config.api_base_url, "https://restcountries.com/v3.1");
/// # Ok::<(), jsonland::JsonLandError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory for the store and trace files. A leading `~` is expanded.
    /// Default: `.jsonland`
    pub data_dir: String,

    /// Base URL of the country dataset. Default: REST Countries v3.1
    pub api_base_url: String,

    /// Quiet period before a criterion change triggers a fetch. Default: 300
    pub debounce_ms: u64,

    /// Per-request timeout. Default: none
    pub request_timeout_secs: Option<u64>,

    /// Tracing level: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: infrastructure::DEFAULT_DATA_DIR.to_string(),
            api_base_url: search::DEFAULT_BASE_URL.to_string(),
            debounce_ms: 300,
            request_timeout_secs: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`JsonLandError::Config`] on malformed TOML, wrong value types,
    /// or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| JsonLandError::Config(e.to_string()))
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`JsonLandError::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            JsonLandError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        infrastructure::expand_tilde(&self.data_dir)
    }

    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        infrastructure::store_file(&self.data_dir())
    }

    #[must_use]
    pub fn trace_path(&self) -> PathBuf {
        infrastructure::trace_file(&self.data_dir())
    }

    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
