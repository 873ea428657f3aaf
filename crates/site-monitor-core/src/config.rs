//! Configuration for notification providers and page fetching.
//!
//! Configuration is stored in TOML. Every section is optional: a run that sends
//! no alerts needs no configuration file at all. Credentials are only checked
//! for the destinations a run actually uses.
//!
//! ## File resolution
//!
//! 1. An explicitly named file (`--config` / `SITE_MONITOR_CONFIG`). It must exist.
//! 2. `./config.toml` in the working directory.
//! 3. `config.toml` in the platform config directory (see [`Config::default_path`]).
//!
//! If neither implicit location holds a file, defaults apply.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [sms]
//! account_id = "AC0123"
//! auth_token = "secret"
//! from_number = "+15550000000"
//!
//! [email]
//! api_key = "SG.key"
//! from_address = "alerts@example.com"
//!
//! [notify]
//! phone = "5551234567"
//!
//! [fetch]
//! timeout_secs = 20
//! ```
//!
//! ```rust
//! use site_monitor_core::Config;
//!
//! let config = Config::from_toml_str("[sms]\naccount_id = \"AC1\"\n")?;
//! assert!(config.sms_credentials().is_err()); // token and sender still missing
//! # Ok::<(), site_monitor_core::Error>(())
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working and platform config directories
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default base URL of the text-messaging provider
pub const DEFAULT_SMS_API_BASE: &str = "https://api.twilio.com";

/// Default base URL of the email provider
pub const DEFAULT_EMAIL_API_BASE: &str = "https://api.sendgrid.com";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Text-messaging provider credentials
    pub sms: SmsConfig,
    /// Email provider credentials
    pub email: EmailConfig,
    /// Default alert destinations
    pub notify: NotifyConfig,
    /// Page fetch settings
    pub fetch: FetchConfig,
}

/// `[sms]` section
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmsConfig {
    /// Provider account identifier
    pub account_id: Option<String>,
    /// Provider auth token
    pub auth_token: Option<String>,
    /// Sender phone number
    pub from_number: Option<String>,
    /// Override for the provider base URL
    pub api_base: Option<String>,
}

/// `[email]` section
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmailConfig {
    /// Provider API key, sent as a bearer token
    pub api_key: Option<String>,
    /// Sender address
    pub from_address: Option<String>,
    /// Override for the provider base URL
    pub api_base: Option<String>,
}

/// `[notify]` section: destinations used when none are given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifyConfig {
    /// Default text alert destination
    pub phone: Option<String>,
    /// Default email alert destination
    pub email: Option<String>,
}

/// `[fetch]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// User agent override
    pub user_agent: Option<String>,
}

/// Complete credentials for the text-messaging provider
#[derive(Clone, PartialEq, Eq)]
pub struct SmsCredentials {
    /// Provider account identifier
    pub account_id: String,
    /// Provider auth token
    pub auth_token: String,
    /// Sender phone number
    pub from_number: String,
    /// Provider base URL
    pub api_base: String,
}

/// Complete credentials for the email provider
#[derive(Clone, PartialEq, Eq)]
pub struct EmailCredentials {
    /// Provider API key
    pub api_key: String,
    /// Sender address
    pub from_address: String,
    /// Provider base URL
    pub api_base: String,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from a specific file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config '{}': {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config '{}': {e}", path.display()))
        })
    }

    /// Resolve and load configuration.
    ///
    /// Returns the configuration and the file it came from, or `None` when
    /// defaults were used.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(path) = Self::default_path() {
            candidates.push(path);
        }
        Self::resolve_from(explicit, &candidates)
    }

    /// Same as [`Config::resolve`] with an explicit list of implicit locations
    pub fn resolve_from(
        explicit: Option<&Path>,
        candidates: &[PathBuf],
    ) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Ok((Self::load_from(path)?, Some(path.to_path_buf())));
        }

        for candidate in candidates {
            if candidate.is_file() {
                debug!("Loading config from {}", candidate.display());
                return Ok((Self::load_from(candidate)?, Some(candidate.clone())));
            }
        }

        debug!("No config file found; using defaults");
        Ok((Self::default(), None))
    }

    /// Platform config file location:
    /// - Linux: `~/.config/site-monitor/config.toml`
    /// - macOS: `~/Library/Application Support/dev.site-monitor.site-monitor/config.toml`
    /// - Windows: `%APPDATA%\site-monitor\site-monitor\config\config.toml`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "site-monitor", "site-monitor")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Credentials for text alerts; errors name every missing field
    pub fn sms_credentials(&self) -> Result<SmsCredentials> {
        let sms = &self.sms;
        let missing = missing_fields(&[
            ("sms.account_id", &sms.account_id),
            ("sms.auth_token", &sms.auth_token),
            ("sms.from_number", &sms.from_number),
        ]);
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "Text alerts requested but {} not set",
                missing.join(", ")
            )));
        }

        Ok(SmsCredentials {
            account_id: required(&sms.account_id),
            auth_token: required(&sms.auth_token),
            from_number: required(&sms.from_number),
            api_base: base_or_default(&sms.api_base, DEFAULT_SMS_API_BASE),
        })
    }

    /// Credentials for email alerts; errors name every missing field
    pub fn email_credentials(&self) -> Result<EmailCredentials> {
        let email = &self.email;
        let missing = missing_fields(&[
            ("email.api_key", &email.api_key),
            ("email.from_address", &email.from_address),
        ]);
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "Email alerts requested but {} not set",
                missing.join(", ")
            )));
        }

        Ok(EmailCredentials {
            api_key: required(&email.api_key),
            from_address: required(&email.from_address),
            api_base: base_or_default(&email.api_base, DEFAULT_EMAIL_API_BASE),
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required(value: &Option<String>) -> String {
    present(value).unwrap_or_default().to_string()
}

fn missing_fields(fields: &[(&'static str, &Option<String>)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(name, _)| *name)
        .collect()
}

fn base_or_default(value: &Option<String>, default: &str) -> String {
    present(value)
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsConfig")
            .field("account_id", &self.account_id)
            .field("auth_token", &self.auth_token.as_ref().map(|_| REDACTED))
            .field("from_number", &self.from_number)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("from_address", &self.from_address)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl fmt::Debug for SmsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsCredentials")
            .field("account_id", &self.account_id)
            .field("auth_token", &REDACTED)
            .field("from_number", &self.from_number)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl fmt::Debug for EmailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("api_key", &REDACTED)
            .field("from_address", &self.from_address)
            .field("api_base", &self.api_base)
            .finish()
    }
}
