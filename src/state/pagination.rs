//! Pagination state machine.
//!
//! [`PaginationController`] is the single writer of [`ListState`]. Page fetches run on worker
//! threads; their completions come back over a channel and are applied by the owner through
//! [`PaginationController::poll_completions`] or [`PaginationController::wait_for_completion`].
//!
//! ```text
//! Idle --request_page--> LoadingInitial --ok--> Loaded --request_page--> LoadingMore
//!   ^                          |                  ^                           |
//!   +----------err-------------+                  +-----------ok / err--------+
//! ```

use super::list_state::{ListState, Snapshot};
use crate::model::{FetchError, ReviewsPage, RowFactory, RowId};
use crate::source::FetchProvider;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Screens of remaining content below which the next page is requested.
pub const DEFAULT_PREFETCH_SCREENS: f64 = 2.5;

/// Result of [`PaginationController::request_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A fetch was dispatched.
    Started,
    /// A fetch is already outstanding; nothing was dispatched.
    AlreadyInFlight,
    /// Every page has been loaded.
    Exhausted,
}

/// Near-end predicate evaluated when a scroll gesture is about to settle.
///
/// True when the distance left below the projected viewport is at most `prefetch_screens`
/// viewport heights.
pub fn should_prefetch(
    viewport_height: f64,
    content_height: f64,
    target_offset: f64,
    prefetch_screens: f64,
) -> bool {
    let remaining = content_height - viewport_height - target_offset;
    remaining <= viewport_height * prefetch_screens
}

/// A finished page fetch.
#[derive(Debug)]
struct Completion {
    offset: usize,
    outcome: Result<ReviewsPage, FetchError>,
}

/// Owns the list state and drives page loading.
pub struct PaginationController {
    state: Snapshot,
    provider: Arc<dyn FetchProvider>,
    factory: RowFactory,
    prefetch_screens: f64,
    subscriber: Option<Sender<Snapshot>>,
    completion_tx: Sender<Completion>,
    completion_rx: Receiver<Completion>,
}

impl std::fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("state", &self.state)
            .field("prefetch_screens", &self.prefetch_screens)
            .field("subscribed", &self.subscriber.is_some())
            .finish_non_exhaustive()
    }
}

impl PaginationController {
    /// Controller fetching `page_size` reviews per page from `provider`.
    pub fn new(provider: impl FetchProvider, factory: RowFactory, page_size: usize) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel();
        Self {
            state: Arc::new(ListState::new(page_size)),
            provider: Arc::new(provider),
            factory,
            prefetch_screens: DEFAULT_PREFETCH_SCREENS,
            subscriber: None,
            completion_tx,
            completion_rx,
        }
    }

    /// Overrides the near-end threshold used by [`Self::on_scroll_will_end`].
    pub fn with_prefetch_screens(mut self, screens: f64) -> Self {
        self.prefetch_screens = screens;
        self
    }

    /// Near-end threshold in viewport heights.
    pub fn prefetch_screens(&self) -> f64 {
        self.prefetch_screens
    }

    /// Current state.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.state)
    }

    /// Replaces the subscriber. Every state change sends a snapshot to it.
    pub fn subscribe(&mut self, subscriber: Sender<Snapshot>) {
        self.subscriber = Some(subscriber);
    }

    /// Requests the next page unless one is in flight or the list is exhausted.
    pub fn request_page(&mut self) -> RequestOutcome {
        if self.state.in_flight {
            debug!("Page request ignored: fetch in flight");
            return RequestOutcome::AlreadyInFlight;
        }
        if !self.state.has_more {
            debug!("Page request ignored: list exhausted");
            return RequestOutcome::Exhausted;
        }

        let state = Arc::make_mut(&mut self.state);
        state.in_flight = true;
        let offset = state.next_offset;
        let first_page = state.rows.is_empty();
        if first_page {
            state.is_loading = true;
            self.notify();
        }

        debug!(offset, first_page, "Requesting page");
        self.dispatch(offset);
        RequestOutcome::Started
    }

    fn dispatch(&self, offset: usize) {
        let provider = Arc::clone(&self.provider);
        let tx = self.completion_tx.clone();
        let spawned = std::thread::Builder::new()
            .name("page-fetch".to_string())
            .spawn(move || {
                let outcome = provider
                    .fetch_page(offset)
                    .and_then(|bytes| ReviewsPage::decode(&bytes));
                // The controller may be gone; nothing left to tell
                let _ = tx.send(Completion { offset, outcome });
            });

        if let Err(err) = spawned {
            let _ = self.completion_tx.send(Completion {
                offset,
                outcome: Err(FetchError::transport(format!(
                    "cannot start fetch thread: {err}"
                ))),
            });
        }
    }

    /// Applies every completion that has already arrived. Returns how many were applied.
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Blocks up to `timeout` for a completion, then applies it and anything else queued.
    ///
    /// Returns false if nothing arrived in time.
    pub fn wait_for_completion(&mut self, timeout: Duration) -> bool {
        match self.completion_rx.recv_timeout(timeout) {
            Ok(completion) => {
                self.apply(completion);
                self.poll_completions();
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    fn apply(&mut self, completion: Completion) {
        let Completion { offset, outcome } = completion;
        match outcome {
            Ok(page) => {
                let received = page.items.len();
                let rows: Vec<_> = page
                    .items
                    .into_iter()
                    .map(|record| Arc::new(self.factory.make_row(record)))
                    .collect();

                let state = Arc::make_mut(&mut self.state);
                state.rows.extend(rows);
                state.next_offset += state.page_size;
                state.total_count = page.count;
                state.has_more = state.next_offset < state.total_count;
                state.in_flight = false;
                state.is_loading = false;
                state.last_error = None;

                debug!(
                    offset,
                    received,
                    total = state.total_count,
                    has_more = state.has_more,
                    "Page merged"
                );
            }
            Err(err) => {
                warn!(offset, error = %err, "Page fetch failed");
                let state = Arc::make_mut(&mut self.state);
                state.in_flight = false;
                state.is_loading = false;
                state.has_more = true;
                state.last_error = Some(err.to_string());
            }
        }
        self.notify();
    }

    /// Removes the line limit of the row with `id`.
    ///
    /// Returns false, without notifying, if the row is unknown or already expanded.
    pub fn expand_row(&mut self, id: RowId) -> bool {
        let Some(index) = self.state.position(id) else {
            debug!(%id, "Expand ignored: unknown row");
            return false;
        };
        if self.state.rows[index].is_expanded() {
            return false;
        }

        let expanded = Arc::new(self.state.rows[index].expanded());
        Arc::make_mut(&mut self.state).rows[index] = expanded;
        debug!(%id, index, "Row expanded");
        self.notify();
        true
    }

    /// Scroll-settle hook: requests the next page when the projected offset is near the end.
    ///
    /// Returns `None` if the content is not near its end.
    pub fn on_scroll_will_end(
        &mut self,
        viewport_height: f64,
        content_height: f64,
        target_offset: f64,
    ) -> Option<RequestOutcome> {
        should_prefetch(
            viewport_height,
            content_height,
            target_offset,
            self.prefetch_screens,
        )
        .then(|| self.request_page())
    }

    fn notify(&mut self) {
        let Some(subscriber) = &self.subscriber else {
            return;
        };
        if subscriber.send(Arc::clone(&self.state)).is_err() {
            debug!("Subscriber dropped; notifications disabled");
            self.subscriber = None;
        }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
