//! Fixture-backed page provider.
//!
//! Serves pages sliced out of a local reviews JSON file (the same `{items, count}` shape the
//! backend returns) and sleeps before every response to simulate a network round trip.

use super::FetchProvider;
use crate::model::{FetchError, ReviewRecord, ReviewsPage};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// Page provider backed by a JSON fixture.
///
/// # Design
///
/// - The file is read lazily on the first request and kept after a successful read
/// - A failed read is not remembered, so the next request tries the file again
/// - `count` in every page is the number of records in the fixture
#[derive(Debug)]
pub struct FixtureProvider {
    origin: Origin,
    page_size: usize,
    latency: Duration,
    loaded: Mutex<Option<Arc<Vec<ReviewRecord>>>>,
}

#[derive(Debug)]
enum Origin {
    File(PathBuf),
    Memory,
}

impl FixtureProvider {
    /// Provider reading `path` on first use.
    pub fn new(path: impl AsRef<Path>, page_size: usize, latency: Duration) -> Self {
        Self {
            origin: Origin::File(path.as_ref().to_path_buf()),
            page_size: page_size.max(1),
            latency,
            loaded: Mutex::new(None),
        }
    }

    /// Provider over records already in memory.
    pub fn from_records(records: Vec<ReviewRecord>, page_size: usize, latency: Duration) -> Self {
        Self {
            origin: Origin::Memory,
            page_size: page_size.max(1),
            latency,
            loaded: Mutex::new(Some(Arc::new(records))),
        }
    }

    /// Reads the fixture now instead of on the first request.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the file cannot be read and [`FetchError::Decode`]
    /// if it is not a valid page.
    pub fn load(&self) -> Result<usize, FetchError> {
        Ok(self.records()?.len())
    }

    fn records(&self) -> Result<Arc<Vec<ReviewRecord>>, FetchError> {
        let mut loaded = self
            .loaded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(records) = loaded.as_ref() {
            return Ok(Arc::clone(records));
        }

        let path = match &self.origin {
            Origin::File(path) => path,
            Origin::Memory => return Ok(Arc::new(Vec::new())),
        };
        let bytes = std::fs::read(path).map_err(|err| {
            FetchError::transport(format!("cannot read fixture {}: {}", path.display(), err))
        })?;
        let page = ReviewsPage::decode(&bytes)?;
        debug!(path = %path.display(), records = page.items.len(), "Loaded review fixture");

        let records = Arc::new(page.items);
        *loaded = Some(Arc::clone(&records));
        Ok(records)
    }

    /// The page starting at `offset`, without the simulated latency.
    ///
    /// # Errors
    ///
    /// See [`FixtureProvider::load`].
    pub fn page_at(&self, offset: usize) -> Result<ReviewsPage, FetchError> {
        let records = self.records()?;
        let start = offset.min(records.len());
        let end = offset.saturating_add(self.page_size).min(records.len());

        Ok(ReviewsPage {
            items: records[start..end].to_vec(),
            count: records.len(),
        })
    }
}

impl FetchProvider for FixtureProvider {
    fn fetch_page(&self, offset: usize) -> Result<Vec<u8>, FetchError> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        self.page_at(offset)?.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn records(n: usize) -> Vec<ReviewRecord> {
        (0..n)
            .map(|i| ReviewRecord {
                text: format!("review {i}"),
                created: "today".to_string(),
                first_name: format!("First{i}"),
                last_name: "Last".to_string(),
                rating: (i % 6) as i32,
                avatar_url: None,
            })
            .collect()
    }

    fn fixture_file(name: &str, n: usize) -> PathBuf {
        let path = std::env::temp_dir().join(format!("reviewlist_fixture_{name}.json"));
        let page = ReviewsPage {
            items: records(n),
            count: 999,
        };
        fs::write(&path, page.encode().unwrap()).unwrap();
        path
    }

    #[test]
    fn pages_slice_the_fixture() {
        let provider = FixtureProvider::from_records(records(57), 20, Duration::ZERO);

        let first = provider.page_at(0).unwrap();
        assert_eq!(first.items.len(), 20);
        assert_eq!(first.count, 57);
        assert_eq!(first.items[0].text, "review 0");

        let last = provider.page_at(40).unwrap();
        assert_eq!(last.items.len(), 17);
        assert_eq!(last.items[16].text, "review 56");
    }

    #[test]
    fn offset_past_end_yields_empty_page() {
        let provider = FixtureProvider::from_records(records(5), 20, Duration::ZERO);
        let page = provider.page_at(100).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.count, 5);
    }

    #[test]
    fn fetch_page_returns_decodable_bytes() {
        let provider = FixtureProvider::from_records(records(3), 2, Duration::ZERO);
        let bytes = provider.fetch_page(2).unwrap();
        let page = ReviewsPage::decode(&bytes).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.count, 3);
    }

    #[test]
    fn count_comes_from_fixture_length_not_file_count() {
        let path = fixture_file("count", 7);
        let provider = FixtureProvider::new(&path, 5, Duration::ZERO);

        let page = provider.page_at(0).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(page.count, 7);
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn fixture_is_kept_after_first_read() {
        let path = fixture_file("kept", 4);
        let provider = FixtureProvider::new(&path, 10, Duration::ZERO);
        assert_eq!(provider.load().unwrap(), 4);

        // Deleting the file afterwards does not matter
        fs::remove_file(&path).unwrap();
        assert_eq!(provider.page_at(0).unwrap().items.len(), 4);
    }

    #[test]
    fn missing_file_is_transport_error() {
        let provider = FixtureProvider::new(
            "/nonexistent/reviewlist/fixture.json",
            20,
            Duration::ZERO,
        );
        let err = provider.fetch_page(0).unwrap_err();
        assert!(err.is_transport(), "got {:?}", err);
    }

    #[test]
    fn malformed_file_is_decode_error() {
        let path = std::env::temp_dir().join("reviewlist_fixture_malformed.json");
        fs::write(&path, b"{\"items\": [").unwrap();
        let provider = FixtureProvider::new(&path, 20, Duration::ZERO);

        let err = provider.fetch_page(0).unwrap_err();
        let _ = fs::remove_file(&path);

        assert!(matches!(err, FetchError::Decode { .. }), "got {:?}", err);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let provider = FixtureProvider::from_records(records(3), 0, Duration::ZERO);
        assert_eq!(provider.page_at(0).unwrap().items.len(), 1);
    }
}
