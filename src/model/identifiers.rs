//! Opaque row identity tokens.
//!
//! Identity is assigned at construction and never derived from content, so two reviews with
//! identical text still get distinct ids. Raw constructors are never exported.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ROW_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a row in the review list.
///
/// Stable across snapshots: expanding a row replaces its value but keeps its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    /// Allocate a fresh id, distinct from every id issued before in this process.
    pub fn next() -> Self {
        Self(NEXT_ROW_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw token value, for logging.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn next_ids_are_distinct() {
        let ids: HashSet<RowId> = (0..1000).map(|_| RowId::next()).collect();
        assert_eq!(ids.len(), 1000, "every allocation must be unique");
    }

    #[test]
    fn next_ids_are_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| RowId::next()).collect::<Vec<_>>()))
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(ids.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn display_is_prefixed() {
        let id = RowId::next();
        assert_eq!(id.to_string(), format!("row-{}", id.get()));
    }
}
