//! Resend (resend.com) email provider.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::email::EmailMessage;
use crate::ports::{EmailError, EmailSender, SentEmail};

use super::error_for_status;

const PROVIDER: &str = "resend";

pub struct ResendEmailSender {
    api_key: Option<SecretString>,
    from: String,
    base_url: String,
    client: Client,
}

impl ResendEmailSender {
    /// `from` is a full header value such as `Events <noreply@example.com>`.
    pub fn new(api_key: Option<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()).map(SecretString::new),
            from: from.into(),
            base_url: "https://api.resend.com".to_string(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: String,
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<SentEmail, EmailError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| EmailError::NotConfigured {
            provider: PROVIDER.to_string(),
        })?;

        let body = ResendRequest {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html_body,
            text: message.text_body.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::Network {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(error_for_status(PROVIDER, status, text));
        }

        let parsed: ResendResponse = response.json().await.map_err(|e| EmailError::Provider {
            provider: PROVIDER.to_string(),
            message: format!("invalid response: {}", e),
        })?;

        Ok(SentEmail {
            provider: PROVIDER.to_string(),
            message_id: parsed.id,
        })
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let sender = ResendEmailSender::new(None, "Events <noreply@example.com>");
        let message = EmailMessage::new("a@example.com", "Hi", "<p>Hi</p>").unwrap();
        assert_eq!(
            sender.send(&message).await.unwrap_err(),
            EmailError::NotConfigured {
                provider: "resend".into()
            }
        );
    }

    #[test]
    fn request_omits_missing_text() {
        let body = ResendRequest {
            from: "f",
            to: ["t@example.com"],
            subject: "s",
            html: "<p/>",
            text: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["to"][0], "t@example.com");
        assert!(json.get("text").is_none());
    }
}
