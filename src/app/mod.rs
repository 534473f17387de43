//! Application layer: parsed input in, output actions out.
//!
//! ```text
//! stdin line → Event::parse → handle_event → AppState mutations → Vec<Action>
//!                                                   │
//!                        SearchController ── watch::Receiver<SearchStatus> ──▶ shell
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects for the shell to perform
//! - [`handler`]: Event parsing and dispatch
//! - [`modes`]: Which view owns the result area
//! - [`state`]: Session, search, and country source under one owner

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::View;
pub use state::AppState;
