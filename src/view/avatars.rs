//! Avatar requests issued by the shell.
//!
//! Each URL is requested at most once per session. Fetches run on background threads through
//! the shared [`ImageCache`]; the shell polls [`AvatarLoader::settle`] on its timer tick to learn
//! when a redraw would show something new.

use crate::image_cache::{FetchOutcome, ImageCache};
use crate::source::AvatarSource;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::debug;

/// Background avatar requests for the rows on screen.
///
/// Outcomes land in the shared [`ImageCache`]; the loader only remembers what it asked for.
pub struct AvatarLoader {
    cache: Arc<ImageCache>,
    source: Option<Arc<dyn AvatarSource>>,
    /// URLs handed to the cache, successful or not.
    requested: HashSet<String>,
    /// Fetches not yet observed to finish.
    pending: HashMap<String, JoinHandle<FetchOutcome>>,
}

impl AvatarLoader {
    /// Loader filling `cache` from `source`. Without a source nothing is fetched.
    pub fn new(cache: Arc<ImageCache>, source: Option<Arc<dyn AvatarSource>>) -> Self {
        Self {
            cache,
            source,
            requested: HashSet::new(),
            pending: HashMap::new(),
        }
    }

    /// Starts a background fetch for `url` unless one was already started.
    ///
    /// Without a source only avatars already in the cache can be shown.
    pub fn request(&mut self, url: &str) {
        if self.requested.contains(url) || self.cache.get(url).is_some() {
            return;
        }
        let Some(source) = &self.source else {
            return;
        };

        debug!(url, "Requesting avatar");
        self.requested.insert(url.to_string());
        let source = Arc::clone(source);
        let handle = self
            .cache
            .spawn_fetch(url, move |key: &str| source.load(key));
        self.pending.insert(url.to_string(), handle);
    }

    /// Forgets finished fetches. Returns true if any finished since the last call.
    pub fn settle(&mut self) -> bool {
        let before = self.pending.len();
        // Outcomes already live in the cache; failures were logged there
        self.pending.retain(|_, handle| !handle.is_finished());
        before != self.pending.len()
    }

    /// Whether any requested avatar is still loading.
    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Average color of the cached avatar for `url`.
    pub fn color(&self, url: &str) -> Option<[u8; 3]> {
        self.cache.get(url).map(|avatar| avatar.average_color())
    }
}
