//! JSON file-based key-value backend.
//!
//! Keeps every entry in a single human-readable JSON file and rewrites it with an
//! atomic write (write-to-temp + rename) on each modification, so a crash never
//! leaves a half-written file behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "updated_at": 1718000000,
//!   "entries": {
//!     "users": "[{\"username\":\"alice\",...}]",
//!     "currentUser": "{\"username\":\"alice\",...}",
//!     "lastRegion": "Europe"
//!   }
//! }
//! ```

use crate::domain::error::{JsonLandError, Result};
use crate::storage::backend::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    version: u32,

    /// Unix timestamp of the last successful write.
    #[serde(default)]
    updated_at: i64,

    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            updated_at: 0,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file key-value backend.
///
/// The whole map is cached in memory behind a mutex and written through on every
/// `set`/`remove`. Reads never touch the disk after [`JsonFileStore::open`].
pub struct JsonFileStore {
    file_path: PathBuf,
    data: Mutex<StoreFile>,
}

impl JsonFileStore {
    /// Opens the store at `file_path`, creating parent directories as needed.
    ///
    /// A missing file starts an empty store; nothing is written until the first
    /// modification.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but is not a valid store document
    /// - File permissions prevent reading
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON key-value store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no existing store file, starting empty");
            StoreFile::default()
        };

        tracing::debug!(entries = data.entries.len(), "store opened");

        Ok(Self {
            file_path,
            data: Mutex::new(data),
        })
    }

    fn load_from_file(path: &Path) -> Result<StoreFile> {
        let contents = std::fs::read_to_string(path)?;
        let data: StoreFile = serde_json::from_str(&contents)
            .map_err(|e| JsonLandError::Storage(format!("failed to parse store file: {e}")))?;

        if data.version != FORMAT_VERSION {
            return Err(JsonLandError::Storage(format!(
                "unsupported store format version {}",
                data.version
            )));
        }

        Ok(data)
    }

    /// Serializes `data` and atomically replaces the file on disk.
    fn save_to_file(&self, data: &mut StoreFile) -> Result<()> {
        data.updated_at = chrono::Utc::now().timestamp();

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| JsonLandError::Storage(format!("failed to serialize store: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::trace!(path = ?self.file_path, "store saved");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreFile>> {
        self.data
            .lock()
            .map_err(|e| JsonLandError::Storage(format!("store lock poisoned: {e}")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::trace_span!("json_set", key = %key, bytes = value.len()).entered();

        let mut data = self.lock()?;
        let previous = data.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save_to_file(&mut data) {
            // keep memory consistent with disk
            match previous {
                Some(old) => data.entries.insert(key.to_string(), old),
                None => data.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _span = tracing::trace_span!("json_remove", key = %key).entered();

        let mut data = self.lock()?;
        let Some(previous) = data.entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.save_to_file(&mut data) {
            data.entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}
