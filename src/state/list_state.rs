//! Immutable list state published by the pagination controller.

use crate::model::{RowId, RowModel};
use std::sync::Arc;

/// Shared, immutable view of the list at one point in time.
pub type Snapshot = Arc<ListState>;

/// Loading phase derived from the state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Nothing loaded and nothing in flight.
    Idle,
    /// First page requested, no rows yet.
    LoadingInitial,
    /// Rows present, next page in flight.
    LoadingMore,
    /// Rows present, nothing in flight.
    Loaded,
}

/// Everything the list shows.
///
/// # Invariants
/// - `next_offset` only increases
/// - `rows` is append-only except for in-place replacement of an expanded row
/// - `has_more == false` means no further fetch is issued
/// - `total_count` is meaningful only after one successful fetch
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    pub(super) rows: Vec<Arc<RowModel>>,
    pub(super) is_loading: bool,
    pub(super) in_flight: bool,
    pub(super) has_more: bool,
    pub(super) next_offset: usize,
    pub(super) page_size: usize,
    pub(super) total_count: usize,
    pub(super) last_error: Option<String>,
}

impl ListState {
    /// Empty state before the first fetch.
    pub fn new(page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            is_loading: false,
            in_flight: false,
            has_more: true,
            next_offset: 0,
            page_size: page_size.max(1),
            total_count: 0,
            last_error: None,
        }
    }

    /// Loaded rows in display order.
    pub fn rows(&self) -> &[Arc<RowModel>] {
        &self.rows
    }

    /// Index of the row with the given id.
    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    /// True only while the very first page is loading.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// A page fetch is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.in_flight
    }

    /// More pages may exist; false once the backend total is reached.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Offset the next page request starts at.
    pub fn next_offset(&self) -> usize {
        self.next_offset
    }

    /// Reviews requested per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Review count reported by the last successful page.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Message of the most recent failed fetch; cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Everything was loaded and the backend reported at least one review.
    pub fn shows_summary(&self) -> bool {
        !self.has_more && self.total_count > 0
    }

    /// Loading phase derived from rows and the in-flight flag.
    pub fn phase(&self) -> LoadPhase {
        match (self.rows.is_empty(), self.in_flight) {
            (true, false) => LoadPhase::Idle,
            (true, true) => LoadPhase::LoadingInitial,
            (false, true) => LoadPhase::LoadingMore,
            (false, false) => LoadPhase::Loaded,
        }
    }
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}
