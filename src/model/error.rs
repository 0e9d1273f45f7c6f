//! Error types for reviewlist.
//!
//! Errors are split by concern using `thiserror` and compose via `?` and `From`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the binary entry point
//!   - [`FetchError`] - A page could not be produced or decoded
//!   - [`crate::config::ConfigError`] - Config file could not be read or parsed
//!   - [`crate::logging::LoggingError`] - Tracing subscriber setup failed
//!   - [`crate::view::TuiError`] - Terminal failures
//! - [`ImageError`] - Avatar load/decode failures (row-local, never escalated)
//!
//! # Error Recovery Strategy
//!
//! Fetch errors are **non-fatal**: the pagination controller discards the page, clears its
//! in-flight flag and stays eligible for another `request_page()`. Image errors only affect the
//! row that asked for the avatar; the shell draws a placeholder instead.

use thiserror::Error;

/// Top-level application error.
///
/// Only startup and terminal failures reach this type. Everything the core produces at runtime
/// is recovered locally.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// A page fetch failed outside the controller (e.g. fixture preflight).
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Terminal or rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] crate::view::TuiError),
}

/// Failure to obtain a page of reviews.
///
/// Both variants are handled identically by the pagination controller: the page is dropped,
/// no row or offset state changes and the next `request_page()` retries the same offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The provider could not produce bytes (network error, missing fixture, I/O).
    #[error("Transport failure: {reason}")]
    Transport {
        /// Human readable cause.
        reason: String,
    },

    /// Bytes were produced but are not a valid page.
    ///
    /// A single malformed or missing required field fails the whole page.
    #[error("Decode failure: {reason}")]
    Decode {
        /// Decoder message (serde_json includes line/column).
        reason: String,
    },
}

impl FetchError {
    /// Create a transport failure from any displayable cause.
    pub fn transport(reason: impl ToString) -> Self {
        Self::Transport {
            reason: reason.to_string(),
        }
    }

    /// Create a decode failure from any displayable cause.
    pub fn decode(reason: impl ToString) -> Self {
        Self::Decode {
            reason: reason.to_string(),
        }
    }

    /// Whether this failure came from the transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        Self::transport(err)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err)
    }
}

/// Failure to obtain an avatar bitmap.
///
/// Cloneable so a single outcome can be handed to every caller waiting on the same key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// The avatar source could not produce bytes for the URL.
    #[error("Avatar source failed for {url}: {reason}")]
    Source {
        /// Requested URL (cache key).
        url: String,
        /// Underlying cause.
        reason: String,
    },

    /// Bytes were produced but are not a supported image.
    #[error("Failed to decode avatar {url}: {reason}")]
    Decode {
        /// Requested URL (cache key).
        url: String,
        /// Decoder message.
        reason: String,
    },

    /// The thread that owned the fetch went away before reporting an outcome.
    #[error("Avatar fetch for {url} was abandoned")]
    Abandoned {
        /// Requested URL (cache key).
        url: String,
    },
}
