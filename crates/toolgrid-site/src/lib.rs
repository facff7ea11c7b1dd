//! toolgrid Site Library
//!
//! Renders the cross-platform capability matrix as a single static HTML
//! page: one row per unified model entry, one column per serving provider,
//! one classified cell per (row, column, capability).

pub mod load;
pub mod render;

pub use load::{
    load_inputs, SiteInputs, DIRECT_FILE, DIRECT_LIBRARY_FILE, HUB_FILE, ROUTER_FILE,
};
pub use render::{format_reasons_for_tooltip, generate_site};
