//! Storage layer: the durable key-value map behind accounts and search state.
//!
//! # Modules
//!
//! - `backend`: [`KeyValueStore`] trait and the well-known keys
//! - `json`: JSON file backend with atomic writes
//! - `memory`: in-memory backend for tests

pub mod backend;
pub mod json;
pub mod memory;

pub use backend::{keys, KeyValueStore};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
