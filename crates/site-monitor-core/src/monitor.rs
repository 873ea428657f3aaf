//! One monitoring run: fetch, compare against the latest snapshot, persist and
//! alert on change.
//!
//! ```text
//! identify ─▶ locate latest N ─▶ fetch ─┬─ N == 0 ─────────▶ write v1        (new)
//!                                       ├─ body(N) != page ─▶ write vN+1, notify (changed)
//!                                       └─ otherwise ───────▶ nothing       (unchanged)
//! ```
//!
//! Every step runs to completion before the next starts; there are no retries.
//! A fetch failure aborts the run before anything is written.

use crate::compare::{content_digest, has_changed};
use crate::notify::Notifier;
use crate::{
    Error, Identifier, NotificationRecord, Outcome, PageSource, Result, RunReport, Snapshot,
    SnapshotStore,
};
use chrono::Utc;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Runs the snapshot comparison for a URL
pub struct Monitor<S> {
    store: SnapshotStore,
    source: S,
    notifiers: Vec<Box<dyn Notifier>>,
}

impl<S: PageSource> Monitor<S> {
    /// Creates a monitor with no notifiers
    pub fn new(store: SnapshotStore, source: S) -> Self {
        Self {
            store,
            source,
            notifiers: Vec::new(),
        }
    }

    /// Notifiers invoked, in order, when the page changed
    #[must_use]
    pub fn with_notifiers(mut self, notifiers: Vec<Box<dyn Notifier>>) -> Self {
        self.notifiers = notifiers;
        self
    }

    /// Snapshot store used by this monitor
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Executes one run for `url`.
    ///
    /// # Errors
    ///
    /// Storage and fetch failures are returned as errors. Notification failures
    /// are not: they are logged and recorded in the report.
    pub async fn run(&self, url: &str) -> Result<RunReport> {
        let identifier = Identifier::for_url(url);
        debug!("Monitoring {} as {}", url, identifier);

        let previous = self.store.load_latest(&identifier)?;
        let body = self.source.fetch_page(url).await?;
        let checked_at = Utc::now();
        let bytes = body.len();
        let sha256 = content_digest(&body);

        let (outcome, version, snapshot_path) = self.record(&identifier, previous, body)?;
        info!("{}: {} (version {})", url, outcome, version);

        let notifications = if outcome == Outcome::Changed {
            self.notify_all(url).await
        } else {
            Vec::new()
        };

        Ok(RunReport {
            url: url.to_string(),
            identifier: identifier.to_string(),
            outcome,
            version,
            snapshot_path,
            bytes,
            sha256,
            checked_at,
            notifications,
        })
    }

    fn record(
        &self,
        identifier: &Identifier,
        previous: Option<Snapshot>,
        body: Vec<u8>,
    ) -> Result<(Outcome, u64, Option<PathBuf>)> {
        let (outcome, version) = match previous {
            None => (Outcome::New, 1),
            Some(stored) if !has_changed(&stored.body, &body) => {
                return Ok((Outcome::Unchanged, stored.version, None));
            },
            Some(stored) => {
                let next = stored.version.checked_add(1).ok_or_else(|| {
                    Error::Storage(format!("Version counter exhausted for {identifier}"))
                })?;
                (Outcome::Changed, next)
            },
        };

        let snapshot = Snapshot {
            identifier: identifier.clone(),
            version,
            body,
        };
        let path = self.store.save(&snapshot)?;
        Ok((outcome, version, Some(path)))
    }

    async fn notify_all(&self, url: &str) -> Vec<NotificationRecord> {
        let mut records = Vec::with_capacity(self.notifiers.len());
        for notifier in &self.notifiers {
            let result = notifier.notify(url).await;
            if let Err(e) = &result {
                warn!(
                    "Failed to send {} alert to {}: {}",
                    notifier.channel(),
                    notifier.destination(),
                    e
                );
            }
            records.push(NotificationRecord {
                channel: notifier.channel(),
                destination: notifier.destination().to_string(),
                delivered: result.is_ok(),
                error: result.err().map(|e| e.to_string()),
            });
        }
        records
    }
}
