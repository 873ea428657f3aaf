//! The monitoring run behind the `site-monitor` binary.
//!
//! Everything that can be rejected without touching disk or network is checked
//! first: the URL, the email address, the config file and the provider
//! credentials for each requested destination.

use anyhow::anyhow;
use site_monitor_core::notify::{build_notifiers, normalize_phone};
use site_monitor_core::{Config, Fetcher, Monitor, MonitorTarget, RunReport, SnapshotStore};
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

/// Execute one run for the URL on the command line.
///
/// # Errors
///
/// Returns a categorized error for invalid arguments, configuration problems,
/// storage failures and fetch failures. Failed alerts are part of the report.
pub async fn execute(cli: &Cli) -> Result<RunReport, CliError> {
    site_monitor_core::validate_url(&cli.url)?;
    let email = requested(cli.email.as_deref(), "--email")?;
    if let Some(address) = email {
        if !address.contains('@') {
            return Err(CliError::usage(anyhow!(
                "Invalid email address '{address}': expected user@domain"
            )));
        }
    }
    let phone = requested(cli.phone.as_deref(), "--phone")?;

    let (config, source) = Config::resolve(cli.config.as_deref())?;
    match &source {
        Some(path) => debug!("Using config {}", path.display()),
        None => debug!("No config file; alerts need one for credentials"),
    }

    let target = resolve_target(&cli.url, phone, email, &config);
    let notifiers = build_notifiers(&target, &config)?;

    let store = SnapshotStore::open(&cli.dir)?;
    let fetcher = Fetcher::from_config(&config.fetch).map_err(CliError::internal)?;

    let report = Monitor::new(store, fetcher)
        .with_notifiers(notifiers)
        .run(&target.url)
        .await?;
    Ok(report)
}

/// A destination flag, rejecting values that are blank.
fn requested<'a>(value: Option<&'a str>, flag: &str) -> Result<Option<&'a str>, CliError> {
    match value.map(str::trim) {
        Some("") => Err(CliError::usage(anyhow!("{flag} must not be empty"))),
        other => Ok(other),
    }
}

/// Command-line destinations win over the `[notify]` defaults.
fn resolve_target(
    url: &str,
    phone: Option<&str>,
    email: Option<&str>,
    config: &Config,
) -> MonitorTarget {
    let fallback = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let mut target = MonitorTarget::new(url);
    target.phone = phone
        .map(str::to_string)
        .or_else(|| fallback(&config.notify.phone))
        .map(|number| normalize_phone(&number));
    target.email = email
        .map(str::to_string)
        .or_else(|| fallback(&config.notify.email));
    target
}
