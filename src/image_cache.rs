//! Process-wide avatar cache with per-key fetch deduplication.
//!
//! # Contract
//! - At most one fetch per key is outstanding; concurrent callers for the same key wait on it
//! - Success is stored forever (no eviction) and observed by every current and future caller
//! - Failure is handed to the waiters and then forgotten, so the next `fetch` starts over

use crate::model::ImageError;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock};
use std::thread::JoinHandle;
use tracing::{debug, warn};

/// A decoded avatar bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pixels: image::RgbaImage,
    average: [u8; 3],
}

impl Avatar {
    /// Decode PNG/JPEG bytes into an RGBA bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Decode`] if the format is unsupported or the data is corrupt.
    pub fn decode(url: &str, bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded = image::load_from_memory(bytes).map_err(|err| ImageError::Decode {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    /// Wraps an already decoded bitmap.
    pub fn from_rgba(pixels: image::RgbaImage) -> Self {
        let average = average_color(&pixels);
        Self { pixels, average }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Mean RGB of all pixels, weighted by alpha.
    pub fn average_color(&self) -> [u8; 3] {
        self.average
    }
}

fn average_color(pixels: &image::RgbaImage) -> [u8; 3] {
    let mut sums = [0u64; 3];
    let mut weight = 0u64;
    for px in pixels.pixels() {
        let alpha = u64::from(px[3]);
        for (sum, channel) in sums.iter_mut().zip(px.0.iter()) {
            *sum += u64::from(*channel) * alpha;
        }
        weight += alpha;
    }
    if weight == 0 {
        return [0, 0, 0];
    }
    sums.map(|sum| (sum / weight) as u8)
}

/// What a finished fetch hands to its callers.
pub type FetchOutcome = Result<Arc<Avatar>, ImageError>;

/// Rendezvous for callers waiting on an in-flight fetch.
#[derive(Debug, Default)]
struct PendingFetch {
    outcome: Mutex<Option<FetchOutcome>>,
    ready: Condvar,
}

impl PendingFetch {
    fn publish(&self, outcome: FetchOutcome) {
        let mut slot = lock(&self.outcome);
        *slot = Some(outcome);
        self.ready.notify_all();
    }

    fn wait(&self) -> FetchOutcome {
        let mut slot = lock(&self.outcome);
        loop {
            if let Some(outcome) = slot.as_ref() {
                return outcome.clone();
            }
            slot = self
                .ready
                .wait(slot)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }
}

#[derive(Debug)]
enum Slot {
    Ready(Arc<Avatar>),
    Pending(Arc<PendingFetch>),
}

/// Turns fetched bytes into an avatar.
type Decoder = fn(&str, &[u8]) -> Result<Avatar, ImageError>;

/// Key → decoded image cache.
///
/// Shared as `Arc<ImageCache>`; [`ImageCache::global`] is the process-wide instance.
pub struct ImageCache {
    slots: Mutex<HashMap<String, Slot>>,
    decode: Decoder,
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self {
            slots: Mutex::default(),
            decode: Avatar::decode,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ImageCache {
    /// Empty cache decoding PNG and JPEG.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_decoder(decode: Decoder) -> Self {
        Self {
            decode,
            ..Self::default()
        }
    }

    /// The process-wide cache, created on first use and never torn down.
    pub fn global() -> Arc<ImageCache> {
        static GLOBAL: OnceLock<Arc<ImageCache>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ImageCache::new())))
    }

    /// Cached image for `key`, if a fetch already succeeded.
    pub fn get(&self, key: &str) -> Option<Arc<Avatar>> {
        match lock(&self.slots).get(key) {
            Some(Slot::Ready(avatar)) => Some(Arc::clone(avatar)),
            _ => None,
        }
    }

    /// Whether a fetch for `key` is in flight.
    pub fn is_pending(&self, key: &str) -> bool {
        matches!(lock(&self.slots).get(key), Some(Slot::Pending(_)))
    }

    /// Number of decoded images held.
    pub fn len(&self) -> usize {
        lock(&self.slots)
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    /// True if no image has been decoded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the image for `key`, running `loader` only if no fetch succeeded or is running.
    ///
    /// Blocks while another caller's fetch for the same key is in flight and returns its
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns the loader's error, [`ImageError::Decode`] for undecodable bytes, or
    /// [`ImageError::Abandoned`] if loading or decoding panicked.
    pub fn fetch<F>(&self, key: &str, loader: F) -> Result<Arc<Avatar>, ImageError>
    where
        F: FnOnce(&str) -> Result<Vec<u8>, ImageError>,
    {
        let pending = {
            let mut slots = lock(&self.slots);
            let in_flight = match slots.get(key) {
                Some(Slot::Ready(avatar)) => return Ok(Arc::clone(avatar)),
                Some(Slot::Pending(pending)) => Some(Arc::clone(pending)),
                None => None,
            };
            if let Some(pending) = in_flight {
                drop(slots);
                debug!(key, "Joining in-flight avatar fetch");
                return pending.wait();
            }

            let pending = Arc::new(PendingFetch::default());
            slots.insert(key.to_string(), Slot::Pending(Arc::clone(&pending)));
            pending
        };

        // The slot must be resolved whatever happens past this point
        let decode = self.decode;
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let bytes = loader(key)?;
            decode(key, &bytes)
        }))
        .unwrap_or_else(|_| {
            Err(ImageError::Abandoned {
                url: key.to_string(),
            })
        })
        .map(Arc::new);

        // Map first, so a woken waiter calling `get` already sees the result
        {
            let mut slots = lock(&self.slots);
            match &outcome {
                Ok(avatar) => {
                    slots.insert(key.to_string(), Slot::Ready(Arc::clone(avatar)));
                }
                Err(err) => {
                    warn!(key, error = %err, "Avatar fetch failed");
                    slots.remove(key);
                }
            }
        }
        pending.publish(outcome.clone());
        outcome
    }

    /// Runs [`ImageCache::fetch`] on a background thread.
    pub fn spawn_fetch<F>(
        self: &Arc<Self>,
        key: impl Into<String>,
        loader: F,
    ) -> JoinHandle<FetchOutcome>
    where
        F: FnOnce(&str) -> Result<Vec<u8>, ImageError> + Send + 'static,
    {
        let cache = Arc::clone(self);
        let key = key.into();
        std::thread::spawn(move || cache.fetch(&key, loader))
    }
}
