//! Error types and handling for site-monitor-core operations.
//!
//! Every fallible operation in the core returns [`Result<T, Error>`]. The variants
//! follow the failure classes a monitoring run can hit.
//!
//! ## Error Categories
//!
//! - **I/O / Storage Errors**: snapshot directory listing, snapshot reads and writes
//! - **Network Errors**: fetching the monitored page
//! - **Configuration Errors**: unreadable config files, missing credentials
//! - **Notification Errors**: delivery to the text or email provider
//!
//! Notification errors never abort a run; the monitor records them in the
//! run report instead.

use thiserror::Error;

/// The main error type for site-monitor-core operations.
///
/// `Display` gives a short, user-facing message; the source chain is kept for
/// `Io` and `Network` so callers can inspect the underlying failure.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Raw file system failures that were not wrapped with storage context.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching the monitored page failed.
    ///
    /// Covers connection failures, timeouts and non-success status codes. A
    /// network error never means "unchanged".
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The monitored page does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The page answered with a status that is neither success nor an error
    /// reqwest reports on its own (for example an unfollowed redirect).
    #[error("Unexpected response: {0}")]
    UnexpectedStatus(String),

    /// URL is malformed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Snapshot storage operation failed.
    ///
    /// ## Common Causes
    ///
    /// - Snapshot directory cannot be created or listed
    /// - Snapshot file cannot be read or written
    /// - Attempt to overwrite an existing version
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid, unreadable, or missing required credentials.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Delivering a notification failed.
    ///
    /// Never fatal: the snapshot has already been persisted by the time a
    /// notifier runs.
    #[error("Notification error: {0}")]
    Notify(String),

    /// A run report could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Whether this error came from retrieving the monitored page.
    ///
    /// A missing page is still a fetch failure.
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::NotFound(_) | Self::UnexpectedStatus(_)
        )
    }

    /// Get the error category as a string identifier.
    ///
    /// - `"io"` - raw file system operations
    /// - `"network"` - page fetches
    /// - `"not_found"` - page returned 404
    /// - `"invalid_url"` - URL validation
    /// - `"storage"` - snapshot directory and files
    /// - `"config"` - configuration and credentials
    /// - `"notify"` - alert delivery
    /// - `"serialization"` - data format conversion
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::NotFound(_) => "not_found",
            Self::UnexpectedStatus(_) => "network",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Notify(_) => "notify",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
