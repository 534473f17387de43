//! Filesystem locations derived from the configured data directory.
//!
//! Everything JSON Land writes lives under one data directory: the key-value
//! store file and the OTLP trace file.

use std::path::{Path, PathBuf};

/// Data directory used when the configuration does not name one.
pub const DEFAULT_DATA_DIR: &str = ".jsonland";

/// File name of the key-value store inside the data directory.
pub const STORE_FILE_NAME: &str = "store.json";

/// File name of the OTLP trace export inside the data directory.
pub const TRACE_FILE_NAME: &str = "jsonland-otlp.json";

/// Expands a leading `~` to `$HOME`.
///
/// Paths without a tilde, and tilde paths when `HOME` is unset, are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use jsonland::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/var/lib/jsonland"), PathBuf::from("/var/lib/jsonland"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

#[must_use]
pub fn store_file(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE_NAME)
}

#[must_use]
pub fn trace_file(data_dir: &Path) -> PathBuf {
    data_dir.join(TRACE_FILE_NAME)
}
