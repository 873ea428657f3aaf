use super::{Notifier, check_provider_response, provider_client};
use crate::{Channel, Error, Result, SmsCredentials};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

/// Sends text alerts through a Twilio-compatible messages API.
///
/// One form-encoded POST per alert to
/// `<api_base>/2010-04-01/Accounts/<account_id>/Messages.json`, authenticated
/// with HTTP basic auth.
pub struct SmsNotifier {
    client: Client,
    credentials: SmsCredentials,
    to: String,
}

impl SmsNotifier {
    /// Creates a notifier with its own HTTP client
    pub fn new(credentials: SmsCredentials, to: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(provider_client()?, credentials, to))
    }

    /// Creates a notifier that reuses `client`
    pub fn with_client(client: Client, credentials: SmsCredentials, to: impl Into<String>) -> Self {
        Self {
            client,
            credentials,
            to: to.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.credentials.api_base, self.credentials.account_id
        )
    }
}

/// Text of the alert message
fn message_body(url: &str) -> String {
    format!("WEBSITE UPDATE\n{url}")
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    fn destination(&self) -> &str {
        &self.to
    }

    async fn notify(&self, url: &str) -> Result<()> {
        let body = message_body(url);
        let form = [
            ("From", self.credentials.from_number.as_str()),
            ("To", self.to.as_str()),
            ("Body", body.as_str()),
        ];

        debug!("Sending text alert to {}", self.to);
        let response = self
            .client
            .post(self.endpoint())
            .basic_auth(&self.credentials.account_id, Some(&self.credentials.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Notify(format!("Failed to reach sms provider: {e}")))?;

        check_provider_response("sms provider", response).await?;
        info!("Text alert sent to {}", self.to);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string_contains, header, header_exists, method, path},
    };

    fn credentials(api_base: &str) -> SmsCredentials {
        SmsCredentials {
            account_id: "AC123".into(),
            auth_token: "secret".into(),
            from_number: "+15550000000".into(),
            api_base: api_base.into(),
        }
    }

    #[test]
    fn test_message_body() {
        assert_eq!(
            message_body("https://example.com"),
            "WEBSITE UPDATE\nhttps://example.com"
        );
    }

    #[tokio::test]
    async fn test_sends_form_encoded_message() -> anyhow::Result<()> {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            .and(header(
                "content-type",
                "application/x-www-form-urlencoded",
            ))
            .and(header_exists("authorization"))
            .and(body_string_contains("From=%2B15550000000"))
            .and(body_string_contains("To=%2B15551234567"))
            .and(body_string_contains(
                "Body=WEBSITE+UPDATE%0Ahttps%3A%2F%2Fexample.com",
            ))
            .respond_with(ResponseTemplate::new(201).set_body_string("{\"sid\":\"SM1\"}"))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = SmsNotifier::new(credentials(&server.uri()), "+15551234567")?;
        assert_eq!(notifier.channel(), Channel::Sms);
        assert_eq!(notifier.destination(), "+15551234567");

        notifier.notify("https://example.com").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_uses_basic_auth() -> anyhow::Result<()> {
        let server = MockServer::start().await;

        // base64("AC123:secret")
        Mock::given(method("POST"))
            .and(header("authorization", "Basic QUMxMjM6c2VjcmV0"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = SmsNotifier::new(credentials(&server.uri()), "+15551234567")?;
        notifier.notify("https://example.com").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_provider_rejection_is_notify_error() -> anyhow::Result<()> {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
            .mount(&server)
            .await;

        let notifier = SmsNotifier::new(credentials(&server.uri()), "+15551234567")?;
        let err = notifier.notify("https://example.com").await.unwrap_err();

        assert!(matches!(err, Error::Notify(_)), "got {err:?}");
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("bad credentials"));
        Ok(())
    }
}
