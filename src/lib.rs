//! Review list (reviewlist)
//!
//! Paginated, variable-height list of user reviews with precomputed row geometry.
//!
//! The core (`model`, `view_state`, `state`, `image_cache`) is UI-agnostic and thread-safe; the
//! `view` module is a ratatui shell that drives it from a terminal.

pub mod config;
pub mod image_cache;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;
