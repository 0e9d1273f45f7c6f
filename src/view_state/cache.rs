//! LRU memo for text wrapping results.
//!
//! Wrapping is the expensive part of measurement and the same body is measured at least twice
//! per layout (bounded and unbounded), so results are cached per `(text, font, width)`.

use crate::model::Font;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Capacity used when zero is requested.
pub const DEFAULT_MEASURE_CACHE_CAPACITY: usize = 1024;

/// Key for wrap cache lookup.
///
/// Includes everything that affects line breaking. Floats are keyed by bit pattern so the
/// lookup is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeasureKey {
    text: Arc<str>,
    font: (u64, u64, u64, bool),
    max_width: u64,
}

impl MeasureKey {
    /// Key for wrapping `text` in `font` at `max_width`.
    pub fn new(text: Arc<str>, font: Font, max_width: f64) -> Self {
        Self {
            text,
            font: font.key_bits(),
            max_width: max_width.to_bits(),
        }
    }
}

/// One wrapped line and its measured width.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    /// Line content without the break character.
    pub text: String,
    /// Measured width of the line.
    pub width: f64,
}

/// Full (unbounded) wrap of a text at a given width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WrappedText {
    /// Lines in display order.
    pub lines: Vec<WrappedLine>,
}

/// Thread-safe bounded LRU cache of wrap results.
pub struct MeasureCache {
    cache: Mutex<LruCache<MeasureKey, Arc<WrappedText>>>,
}

impl MeasureCache {
    /// Create a cache holding at most `capacity` wraps.
    ///
    /// If capacity is 0, uses [`DEFAULT_MEASURE_CACHE_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_MEASURE_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Return the cached wrap for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with(
        &self,
        key: MeasureKey,
        compute: impl FnOnce() -> WrappedText,
    ) -> Arc<WrappedText> {
        if let Some(hit) = self.lock().get(&key) {
            return Arc::clone(hit);
        }

        // Computed outside the lock; a concurrent miss computes the same deterministic value.
        let wrapped = Arc::new(compute());
        self.lock().put(key, Arc::clone(&wrapped));
        wrapped
    }

    /// Number of cached wraps.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<MeasureKey, Arc<WrappedText>>> {
        // The cache holds only derived data, so a poisoned lock is still usable.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MeasureCache {
    fn default() -> Self {
        Self::new(DEFAULT_MEASURE_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for MeasureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasureCache")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn key(text: &str, width: f64) -> MeasureKey {
        MeasureKey::new(Arc::from(text), Font::cell(), width)
    }

    fn wrapped(text: &str) -> WrappedText {
        WrappedText {
            lines: vec![WrappedLine {
                text: text.to_string(),
                width: text.len() as f64,
            }],
        }
    }

    #[test]
    fn measure_key_equality_requires_all_fields_match() {
        let base = key("abc", 10.0);
        assert_eq!(base, key("abc", 10.0));
        assert_ne!(base, key("abd", 10.0), "Different text should not match");
        assert_ne!(base, key("abc", 11.0), "Different width should not match");
        assert_ne!(
            base,
            MeasureKey::new(Arc::from("abc"), Font::cell().with_bold(true), 10.0),
            "Different font should not match"
        );
    }

    #[test]
    fn new_with_zero_capacity_uses_default() {
        let cache = MeasureCache::new(0);
        assert!(cache.is_empty());
    }

    #[test]
    fn second_lookup_is_a_hit() {
        let cache = MeasureCache::new(4);
        let calls = Cell::new(0);

        let first = cache.get_or_insert_with(key("abc", 10.0), || {
            calls.set(calls.get() + 1);
            wrapped("abc")
        });
        let second = cache.get_or_insert_with(key("abc", 10.0), || {
            calls.set(calls.get() + 1);
            wrapped("abc")
        });

        assert_eq!(calls.get(), 1, "compute should run once");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = MeasureCache::new(2);
        cache.get_or_insert_with(key("a", 1.0), || wrapped("a"));
        cache.get_or_insert_with(key("b", 1.0), || wrapped("b"));
        // Touch "a" so "b" becomes least recently used
        cache.get_or_insert_with(key("a", 1.0), || unreachable!("a is cached"));
        cache.get_or_insert_with(key("c", 1.0), || wrapped("c"));

        assert_eq!(cache.len(), 2);
        let recomputed = Cell::new(false);
        cache.get_or_insert_with(key("b", 1.0), || {
            recomputed.set(true);
            wrapped("b")
        });
        assert!(recomputed.get(), "b should have been evicted");
    }
}
