//! Maps a list snapshot onto per-index layout queries.
//!
//! The catalog holds the review rows of a snapshot plus, once every page has been loaded, one
//! synthetic summary row at the end.

use super::height_index::HeightIndex;
use super::row_layout::{LayoutResult, RowLayoutEngine};
use super::summary_layout::{layout_summary, SummaryLayout};
use crate::model::RowModel;
use crate::state::Snapshot;
use std::sync::Arc;

/// One entry of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogRow {
    /// A review from the snapshot.
    Review(Arc<RowModel>),
    /// Trailing "Total reviews: N" row.
    Summary {
        /// Review count reported by the backend.
        total_count: usize,
    },
}

/// Geometry of one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogLayout {
    /// Geometry of a review row.
    Review(LayoutResult),
    /// Geometry of the trailing summary row.
    Summary(SummaryLayout),
}

impl CatalogLayout {
    /// Height of the entry.
    pub fn total_height(&self) -> f64 {
        match self {
            CatalogLayout::Review(layout) => layout.total_height,
            CatalogLayout::Summary(layout) => layout.total_height,
        }
    }
}

/// Index-based view over a snapshot.
#[derive(Debug, Clone)]
pub struct RowCatalog {
    snapshot: Snapshot,
    engine: Arc<RowLayoutEngine>,
}

impl RowCatalog {
    /// Catalog over `snapshot`, laid out by `engine`.
    pub fn new(snapshot: Snapshot, engine: Arc<RowLayoutEngine>) -> Self {
        Self { snapshot, engine }
    }

    /// The state this catalog presents.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Layout engine shared by every catalog of a session.
    pub fn engine(&self) -> &Arc<RowLayoutEngine> {
        &self.engine
    }

    /// Review rows plus the summary row when the list is exhausted and non-empty.
    pub fn count(&self) -> usize {
        self.snapshot.rows().len() + usize::from(self.snapshot.shows_summary())
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Entry at `index`, or `None` past the end.
    pub fn row_at(&self, index: usize) -> Option<CatalogRow> {
        let rows = self.snapshot.rows();
        if let Some(row) = rows.get(index) {
            return Some(CatalogRow::Review(Arc::clone(row)));
        }
        (index == rows.len() && self.snapshot.shows_summary()).then(|| CatalogRow::Summary {
            total_count: self.snapshot.total_count(),
        })
    }

    /// Height of the entry at `index`; `None` past the end.
    pub fn height(&self, index: usize, width: f64) -> Option<f64> {
        self.layout(index, width).map(|layout| layout.total_height())
    }

    /// Geometry of the entry at `index`; the summary row bypasses the row engine.
    pub fn layout(&self, index: usize, width: f64) -> Option<CatalogLayout> {
        Some(match self.row_at(index)? {
            CatalogRow::Review(row) => CatalogLayout::Review(self.engine.layout(&row, width)),
            CatalogRow::Summary { total_count } => CatalogLayout::Summary(layout_summary(
                total_count,
                width,
                self.engine.metrics(),
                self.engine.typography(),
                self.engine.text_metrics(),
            )),
        })
    }

    /// Prefix-sum index over every entry's height at `width`, in whole units.
    pub fn height_index(&self, width: f64) -> HeightIndex {
        HeightIndex::from_heights((0..self.count()).map(|index| self.height_units(index, width)))
    }

    /// Brings `index`, built from `previous` at `width`, up to date with this catalog.
    ///
    /// Rows shared with `previous` keep their heights. Replaced rows are re-measured in place,
    /// new entries are appended. Only a shrinking list forces a full rebuild.
    pub fn update_height_index(&self, previous: &RowCatalog, index: &mut HeightIndex, width: f64) {
        let old_rows = previous.snapshot.rows();
        let rows = self.snapshot.rows();
        if index.len() != previous.count()
            || rows.len() < old_rows.len()
            || self.count() < index.len()
        {
            *index = self.height_index(width);
            return;
        }

        for (i, (old, new)) in old_rows.iter().zip(rows).enumerate() {
            if !Arc::ptr_eq(old, new) {
                index.set(i, self.height_units(i, width));
            }
        }

        // The old trailer slot now holds either a review or a re-counted trailer
        for i in old_rows.len()..index.len() {
            index.set(i, self.height_units(i, width));
        }
        for i in index.len()..self.count() {
            index.push(self.height_units(i, width));
        }
    }

    fn height_units(&self, index: usize, width: f64) -> usize {
        HeightIndex::units(self.height(index, width).unwrap_or(0.0))
    }
}
