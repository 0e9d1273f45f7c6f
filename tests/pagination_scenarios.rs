//! End-to-end pagination over the bundled fixture.
//!
//! Drives a `PaginationController` backed by `FixtureProvider` the way the shell does: request,
//! wait for the worker, read the published snapshots.

use reviewlist::model::{FetchError, ReviewsPage, RowFactory, Typography};
use reviewlist::source::{FetchProvider, FixtureProvider};
use reviewlist::state::{LoadPhase, PaginationController, RequestOutcome, Snapshot};
use reviewlist::view_state::{CatalogRow, RowCatalog, RowLayoutEngine};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("reviews.json")
}

fn fixture_page() -> ReviewsPage {
    let bytes = std::fs::read(fixture_path()).expect("bundled fixture should exist");
    ReviewsPage::decode(&bytes).expect("bundled fixture should decode")
}

fn controller(page_size: usize) -> PaginationController {
    let provider = FixtureProvider::new(fixture_path(), page_size, Duration::ZERO);
    PaginationController::new(
        provider,
        RowFactory::new(Typography::terminal(), 3),
        page_size,
    )
}

fn load_next(controller: &mut PaginationController) {
    assert_eq!(controller.request_page(), RequestOutcome::Started);
    assert!(controller.wait_for_completion(WAIT), "page never arrived");
}

// ===== Full Walk =====

#[test]
fn pages_through_the_whole_fixture_in_order() {
    let expected = fixture_page();
    let mut controller = controller(10);

    for (pages, loaded) in [(1, 10), (2, 20), (3, 25)] {
        load_next(&mut controller);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.rows().len(), loaded, "after {pages} pages");
        assert_eq!(snapshot.total_count(), expected.count);
    }

    let snapshot = controller.snapshot();
    assert!(!snapshot.has_more());
    assert_eq!(snapshot.phase(), LoadPhase::Loaded);
    assert_eq!(controller.request_page(), RequestOutcome::Exhausted);

    for (row, record) in snapshot.rows().iter().zip(&expected.items) {
        assert_eq!(row.first_name(), record.first_name);
        assert_eq!(row.styled_text().text(), record.text);
        assert_eq!(row.rating(), record.rating);
    }
}

#[test]
fn catalog_appends_summary_once_exhausted() {
    let mut controller = controller(25);
    load_next(&mut controller);

    let catalog = RowCatalog::new(controller.snapshot(), Arc::new(RowLayoutEngine::terminal()));
    assert_eq!(catalog.count(), 26);
    assert_eq!(
        catalog.row_at(25),
        Some(CatalogRow::Summary { total_count: 25 })
    );

    let index = catalog.height_index(80.0);
    let summed: f64 = (0..catalog.count())
        .map(|i| catalog.height(i, 80.0).unwrap())
        .sum();
    assert_eq!(index.total() as f64, summed);
}

// ===== Notifications =====

#[test]
fn subscriber_sees_loading_then_rows() {
    let (tx, rx) = mpsc::channel::<Snapshot>();
    let mut controller = controller(10);
    controller.subscribe(tx);

    load_next(&mut controller);
    let snapshots: Vec<Snapshot> = rx.try_iter().collect();

    assert_eq!(snapshots.len(), 2, "one for loading, one for the page");
    assert!(snapshots[0].is_loading());
    assert!(snapshots[0].rows().is_empty());
    assert!(!snapshots[1].is_loading());
    assert_eq!(snapshots[1].rows().len(), 10);
}

#[test]
fn expanding_replaces_only_that_row() {
    let mut controller = controller(10);
    load_next(&mut controller);
    let before = controller.snapshot();
    let target = before.rows()[1].id();

    assert!(controller.expand_row(target));
    let after = controller.snapshot();

    assert!(after.rows()[1].is_expanded());
    assert_eq!(after.rows()[1].id(), target);
    for i in (0..after.rows().len()).filter(|&i| i != 1) {
        assert!(Arc::ptr_eq(&before.rows()[i], &after.rows()[i]), "row {i} changed");
    }
    assert!(!before.rows()[1].is_expanded(), "old snapshot is untouched");
}

// ===== Failure and Recovery =====

#[test]
fn missing_fixture_fails_then_recovers_once_written() {
    let dir = std::env::temp_dir().join("reviewlist_scenario_recover");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("reviews.json");

    let provider = FixtureProvider::new(&path, 10, Duration::ZERO);
    assert!(matches!(provider.fetch_page(0), Err(FetchError::Transport { .. })));

    let mut controller = PaginationController::new(provider, RowFactory::default(), 10);
    load_next(&mut controller);
    let failed = controller.snapshot();
    assert!(failed.rows().is_empty());
    assert!(failed.has_more(), "failure must keep the list retryable");
    assert!(failed.last_error().is_some());

    std::fs::copy(fixture_path(), &path).unwrap();
    load_next(&mut controller);
    let recovered = controller.snapshot();
    assert_eq!(recovered.rows().len(), 10);
    assert_eq!(recovered.last_error(), None);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_fixture_is_a_decode_error() {
    let path = std::env::temp_dir().join("reviewlist_scenario_malformed.json");
    std::fs::write(&path, r#"{"items": [{"first_name": "x"}], "count": 1}"#).unwrap();

    let provider = FixtureProvider::new(&path, 10, Duration::ZERO);
    let err = provider.fetch_page(0).unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }), "got {err:?}");

    let _ = std::fs::remove_file(&path);
}

// ===== Prefetch =====

#[test]
fn near_end_scroll_requests_the_next_page() {
    let mut controller = controller(10).with_prefetch_screens(1.0);
    load_next(&mut controller);

    // 100 units of content, 20 visible: far from the end
    assert_eq!(controller.on_scroll_will_end(20.0, 100.0, 0.0), None);
    // 100 - 20 - 60 = 20 <= 20
    assert_eq!(
        controller.on_scroll_will_end(20.0, 100.0, 60.0),
        Some(RequestOutcome::Started)
    );
    assert_eq!(
        controller.on_scroll_will_end(20.0, 100.0, 80.0),
        Some(RequestOutcome::AlreadyInFlight)
    );
    assert!(controller.wait_for_completion(WAIT));
    assert_eq!(controller.snapshot().rows().len(), 20);
}
