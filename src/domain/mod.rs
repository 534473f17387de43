//! Domain layer for JSON Land.
//!
//! Core types independent of storage backends and the remote dataset client.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`account`]: Registered accounts and their favorites
//! - [`code`]: Validated two-letter country codes
//! - [`country`]: Country records and the region enumeration

pub mod account;
pub mod code;
pub mod country;
pub mod error;

pub use account::Account;
pub use code::CountryCode;
pub use country::{Country, Region};
pub use error::{JsonLandError, Result};
