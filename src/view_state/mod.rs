//! View-state layer - measurement, row geometry and list indexing
//!
//! Everything here is pure and `Send + Sync`, so heights can be computed off the main thread.
//!
//! # Module Structure
//!
//! - `types`: Size, Rect and EdgeInsets
//! - `cache`: Bounded LRU memo for text wrapping
//! - `text_metrics`: TextMetrics - greedy word-wrap measurement
//! - `layout_params`: LayoutMetrics - fixed spacing and size constants
//! - `row_layout`: RowLayoutEngine - review row geometry and expand decision
//! - `summary_layout`: Trailing "Total reviews" row
//! - `catalog`: RowCatalog - index-based access to a snapshot's rows
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree

pub mod cache;
pub mod catalog;
pub mod height_index;
pub mod layout_params;
pub mod row_layout;
pub mod summary_layout;
pub mod text_metrics;
pub mod types;

// Re-export for convenience
pub use catalog::{CatalogLayout, CatalogRow, RowCatalog};
pub use height_index::HeightIndex;
pub use layout_params::LayoutMetrics;
pub use row_layout::{LayoutResult, RowLayoutEngine};
pub use summary_layout::{layout_summary, summary_text, SummaryLayout};
pub use text_metrics::TextMetrics;
pub use types::{EdgeInsets, Rect, Size};
