use super::{Notifier, check_provider_response, provider_client};
use crate::{Channel, EmailCredentials, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, info};

/// Sends email alerts through a SendGrid-compatible v3 mail API.
///
/// One JSON POST per alert to `<api_base>/v3/mail/send`, authorized with the
/// API key as a bearer token.
pub struct EmailNotifier {
    client: Client,
    credentials: EmailCredentials,
    to: String,
}

impl EmailNotifier {
    /// Creates a notifier with its own HTTP client
    pub fn new(credentials: EmailCredentials, to: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(provider_client()?, credentials, to))
    }

    /// Creates a notifier that reuses `client`
    pub fn with_client(
        client: Client,
        credentials: EmailCredentials,
        to: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            to: to.into(),
        }
    }

    fn payload(&self, url: &str) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": self.to }] }],
            "from": { "email": self.credentials.from_address },
            "subject": format!("Website update: {url}"),
            "content": [{
                "type": "text/plain",
                "value": format!("The page at {url} has changed since it was last checked."),
            }],
        })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    fn destination(&self) -> &str {
        &self.to
    }

    async fn notify(&self, url: &str) -> Result<()> {
        let endpoint = format!("{}/v3/mail/send", self.credentials.api_base);

        debug!("Sending email alert to {}", self.to);
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&self.credentials.api_key)
            .json(&self.payload(url))
            .send()
            .await
            .map_err(|e| Error::Notify(format!("Failed to reach email provider: {e}")))?;

        check_provider_response("email provider", response).await?;
        info!("Email alert sent to {}", self.to);
        Ok(())
    }
}
