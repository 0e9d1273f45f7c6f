//! Page and avatar sources.
//!
//! This module provides the I/O edges the core talks to:
//! - [`FetchProvider`]: blocking "give me the page at this offset" (run on worker threads)
//! - [`FixtureProvider`]: serves pages sliced from a local JSON fixture
//! - [`AvatarSource`]: raw avatar bytes for a URL

use crate::model::FetchError;

pub mod avatar;
pub mod fixture;

pub use avatar::{AvatarSource, DirectoryAvatarSource};
pub use fixture::FixtureProvider;

/// Produces the raw bytes of a review page.
///
/// Implementations block; the pagination controller always calls them from a background thread.
/// Timeouts, if any, belong to the implementation.
pub trait FetchProvider: Send + Sync + 'static {
    /// Fetch the page that starts at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] when no bytes could be produced.
    fn fetch_page(&self, offset: usize) -> Result<Vec<u8>, FetchError>;
}

impl<F> FetchProvider for F
where
    F: Fn(usize) -> Result<Vec<u8>, FetchError> + Send + Sync + 'static,
{
    fn fetch_page(&self, offset: usize) -> Result<Vec<u8>, FetchError> {
        self(offset)
    }
}
