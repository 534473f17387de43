//! Local account store.
//!
//! See [`UserStore`] for the register/login/logout and favorites operations.

pub mod store;

pub use store::UserStore;
