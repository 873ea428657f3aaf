//! # site-monitor-core
//!
//! Core functionality for site-monitor - a cronjob-friendly tool that notices
//! when a web page changes.
//!
//! Each run fetches one page, compares it byte-for-byte with the newest stored
//! snapshot, stores a new version when it differs and tells an operator by text
//! or email.
//!
//! ## Architecture
//!
//! - **Identity**: URLs map to a stable FNV-1a based [`Identifier`]
//! - **Storage**: [`SnapshotStore`] keeps `<identifier>.v<N>.html` files and finds the newest one
//! - **Comparison**: byte-exact change detection in [`compare`]
//! - **Fetching**: [`Fetcher`] behind the [`PageSource`] trait
//! - **Notification**: text and email [`notify::Notifier`]s
//! - **Orchestration**: [`Monitor`] ties a run together and returns a [`RunReport`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use site_monitor_core::{Fetcher, Monitor, SnapshotStore};
//!
//! # async fn run() -> site_monitor_core::Result<()> {
//! let store = SnapshotStore::open("./history")?;
//! let monitor = Monitor::new(store, Fetcher::new()?);
//!
//! let report = monitor.run("https://example.com").await?;
//! println!("{}: version {}", report.outcome, report.version);
//! # Ok(())
//! # }
//! ```

/// Byte-exact comparison and content digests
pub mod compare;
/// Configuration for providers and fetching
pub mod config;
/// Error types and result aliases
pub mod error;
/// HTTP page fetching
pub mod fetcher;
/// URL identifiers
pub mod identity;
/// Run orchestration
pub mod monitor;
/// Change alerts
pub mod notify;
/// Versioned snapshot storage
pub mod storage;
/// Core data types
pub mod types;

// Re-export commonly used types
pub use config::{
    Config, EmailConfig, EmailCredentials, FetchConfig, NotifyConfig, SmsConfig, SmsCredentials,
};
pub use error::{Error, Result};
pub use fetcher::{Fetcher, PageSource, validate_url};
pub use identity::Identifier;
pub use monitor::Monitor;
pub use storage::SnapshotStore;
pub use types::*;
