//! Change alerts through third-party providers.
//!
//! Each [`Notifier`] delivers one message to one destination. Delivery is
//! best-effort: by the time a notifier runs the new snapshot is already on
//! disk, so failures are reported as [`Error::Notify`] and never abort a run.
//!
//! Credentials are handed to each notifier explicitly; nothing here reads
//! configuration on its own.

mod email;
mod sms;

pub use email::EmailNotifier;
pub use sms::SmsNotifier;

use crate::{Channel, Config, Error, MonitorTarget, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Country code prepended to bare 10-digit phone numbers
pub const DEFAULT_COUNTRY_CODE: &str = "+1";

/// Timeout for provider API calls
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// A destination that can be told a page changed
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivery channel
    fn channel(&self) -> Channel;

    /// Phone number or address messages go to
    fn destination(&self) -> &str;

    /// Send the change alert for `url`
    async fn notify(&self, url: &str) -> Result<()>;
}

/// Adds the default country code to a bare 10-digit number.
///
/// ```rust
/// use site_monitor_core::notify::normalize_phone;
///
/// assert_eq!(normalize_phone("5551234567"), "+15551234567");
/// assert_eq!(normalize_phone("+445551234567"), "+445551234567");
/// ```
#[must_use]
pub fn normalize_phone(number: &str) -> String {
    let trimmed = number.trim();
    if trimmed.len() == 10 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        format!("{DEFAULT_COUNTRY_CODE}{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Builds one notifier per destination on `target`, text first.
///
/// # Errors
///
/// Returns [`Error::Config`] when a destination is set but the matching
/// provider credentials are incomplete. Nothing is sent.
pub fn build_notifiers(target: &MonitorTarget, config: &Config) -> Result<Vec<Box<dyn Notifier>>> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
    if target.phone.is_none() && target.email.is_none() {
        return Ok(notifiers);
    }

    let client = provider_client()?;

    if let Some(phone) = &target.phone {
        let credentials = config.sms_credentials()?;
        notifiers.push(Box::new(SmsNotifier::with_client(
            client.clone(),
            credentials,
            phone.clone(),
        )));
    }

    if let Some(email) = &target.email {
        let credentials = config.email_credentials()?;
        notifiers.push(Box::new(EmailNotifier::with_client(
            client,
            credentials,
            email.clone(),
        )));
    }

    Ok(notifiers)
}

pub(crate) fn provider_client() -> Result<Client> {
    Client::builder()
        .timeout(PROVIDER_TIMEOUT)
        .user_agent(crate::fetcher::DEFAULT_USER_AGENT)
        .build()
        .map_err(|e| Error::Notify(format!("Failed to build provider client: {e}")))
}

/// Turns a provider response into `Ok` or a descriptive [`Error::Notify`]
pub(crate) async fn check_provider_response(
    provider: &str,
    response: reqwest::Response,
) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    let detail = body.trim();
    if detail.is_empty() {
        Err(Error::Notify(format!("{provider} rejected message: HTTP {status}")))
    } else {
        Err(Error::Notify(format!(
            "{provider} rejected message: HTTP {status}: {detail}"
        )))
    }
}
