//! Plain-text rendering.
//!
//! The UI layer turns domain state into display strings. Nothing here touches
//! the store or the network; callers decide where the text goes.
//!
//! ```text
//! Account / SearchStatus / Country → viewmodel → renderer → String
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready rows and detail records
//! - [`renderer`]: Text layout for every view
//! - [`helpers`]: Column padding and truncation

pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::{
    render_banner, render_country_list, render_detail, render_help, render_status,
};
pub use viewmodel::{CountryRow, DetailView, FavoriteMark};
