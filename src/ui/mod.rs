//! Presentation layer.
//!
//! ```text
//! ResourceStore → ListingView::from_store → render_listing → String
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Pure projections (dropdown options, lookups, listing view)
//! - [`renderer`]: Plain-text output used by the CLI

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render_flow, render_listing, render_notice, render_options};
pub use viewmodel::{
    filter_options, find_by_id, form_for, options_from_resources, ListingView, RowView,
    SelectOption,
};
