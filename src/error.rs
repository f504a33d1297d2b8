//! Error types for chan-dl
//!
//! Errors are split by the phase that produces them:
//! - [`Error`] covers resolution, enumeration and configuration. Any of these is
//!   fatal to a run and is returned before a single attachment is fetched.
//! - [`EnumerationError`] describes why a listing or thread page could not be read.
//! - [`FetchError`] describes why one attachment failed. It never escapes the
//!   download pipeline; it is reported as that file's outcome.

use crate::types::BackendKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for chan-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for chan-dl
#[derive(Debug, Error)]
pub enum Error {
    /// No configured backend claims the address host
    #[error("unknown or unsupported imageboard host: {host}")]
    UnknownBackend {
        /// The host that matched no backend (empty if the address had none)
        host: String,
    },

    /// The host belongs to a known backend but the path or query does not fit it
    #[error("invalid {backend} address {url}: {reason}")]
    InvalidFormat {
        /// Backend that owns the host
        backend: BackendKind,
        /// The offending address
        url: String,
        /// What was wrong with it
        reason: String,
    },

    /// Listing boards, threads or posts failed
    #[error("enumeration failed: {0}")]
    Enumeration(#[from] EnumerationError),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "concurrency")
        key: Option<String>,
    },

    /// The address string could not be parsed as a URL
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error outside of enumeration (e.g. building the HTTP client)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl Error {
    pub(crate) fn invalid_format(
        backend: BackendKind,
        url: &url::Url,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidFormat {
            backend,
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

/// Reasons a listing or thread page could not be enumerated
#[derive(Debug, Error)]
pub enum EnumerationError {
    /// The request could not be completed (connect, timeout, body read)
    #[error("request to {url} failed: {source}")]
    Transport {
        /// Endpoint that was requested
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Endpoint that was requested
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The response body could not be decoded
    #[error("failed to decode {url}: {reason}")]
    Decode {
        /// Endpoint that was requested
        url: String,
        /// Decoder message
        reason: String,
    },
}

impl EnumerationError {
    /// The endpoint this error belongs to
    pub fn url(&self) -> &str {
        match self {
            EnumerationError::Transport { url, .. }
            | EnumerationError::Status { url, .. }
            | EnumerationError::Decode { url, .. } => url,
        }
    }
}

/// Per-file download failure
///
/// A fetch failure only ever affects the file it belongs to.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A file with the same name is already present at the destination
    #[error("{} already exists", path.display())]
    AlreadyExists {
        /// Destination that was left untouched
        path: PathBuf,
    },

    /// The request failed or timed out
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The media host answered with a non-success status
    #[error("unexpected status code {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Creating the directory or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The fetch task ended without reporting (panicked or was aborted)
    #[error("download task ended unexpectedly: {0}")]
    TaskFailed(String),
}
