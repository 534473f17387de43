//! Infrastructure layer for filesystem locations.

pub mod paths;

pub use paths::{expand_tilde, store_file, trace_file, DEFAULT_DATA_DIR};
