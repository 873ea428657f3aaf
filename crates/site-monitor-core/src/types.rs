use crate::{Identifier, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One stored version of a monitored page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Identifier of the URL this snapshot belongs to
    pub identifier: Identifier,
    /// Version number, starting at 1
    pub version: u64,
    /// Page body exactly as fetched
    pub body: Vec<u8>,
}

/// The URL being watched and where to send alerts about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorTarget {
    /// Page to fetch
    pub url: String,
    /// Text alert destination, already normalized
    pub phone: Option<String>,
    /// Email alert destination
    pub email: Option<String>,
}

impl MonitorTarget {
    /// Target with no alert destinations
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            phone: None,
            email: None,
        }
    }
}

/// What a run concluded about the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No earlier snapshot existed; version 1 was written
    New,
    /// Content differed from the latest snapshot; a new version was written
    Changed,
    /// Content matched the latest snapshot; nothing was written
    Unchanged,
}

impl Outcome {
    /// Whether this outcome persisted a snapshot
    #[must_use]
    pub const fn wrote_snapshot(self) -> bool {
        matches!(self, Self::New | Self::Changed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::New => "new",
            Self::Changed => "changed",
            Self::Unchanged => "no change",
        })
    }
}

/// Delivery channel of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Text message
    Sms,
    /// Email
    Email,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sms => "sms",
            Self::Email => "email",
        })
    }
}

/// Result of one attempted notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Channel used
    pub channel: Channel,
    /// Phone number or email address
    pub destination: String,
    /// Whether the provider accepted the message
    pub delivered: bool,
    /// Failure description when not delivered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything one monitoring run determined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Monitored URL
    pub url: String,
    /// Identifier derived from the URL
    pub identifier: String,
    /// Conclusion of the run
    pub outcome: Outcome,
    /// Latest stored version after the run
    pub version: u64,
    /// Snapshot written by this run, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
    /// Size of the fetched body
    pub bytes: usize,
    /// Base64 SHA-256 of the fetched body
    pub sha256: String,
    /// When the page was checked
    pub checked_at: DateTime<Utc>,
    /// One record per attempted notification
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<NotificationRecord>,
}

impl RunReport {
    /// Notifications that were not delivered
    pub fn failed_notifications(&self) -> impl Iterator<Item = &NotificationRecord> {
        self.notifications.iter().filter(|n| !n.delivered)
    }

    /// Pretty-printed JSON form of the report
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
