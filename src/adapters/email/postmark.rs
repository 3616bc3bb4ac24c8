//! Postmark email provider.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::email::EmailMessage;
use crate::ports::{EmailError, EmailSender, SentEmail};

use super::error_for_status;

const PROVIDER: &str = "postmark";
const TOKEN_HEADER: &str = "X-Postmark-Server-Token";

pub struct PostmarkEmailSender {
    server_token: Option<SecretString>,
    from: String,
    base_url: String,
    client: Client,
}

impl PostmarkEmailSender {
    pub fn new(server_token: Option<String>, from: impl Into<String>) -> Self {
        Self {
            server_token: server_token.filter(|k| !k.is_empty()).map(SecretString::new),
            from: from.into(),
            base_url: "https://api.postmarkapp.com".to_string(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<&'a str>,
    message_stream: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkResponse {
    #[serde(rename = "MessageID")]
    message_id: String,
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    message: String,
}

#[async_trait]
impl EmailSender for PostmarkEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<SentEmail, EmailError> {
        let token = self
            .server_token
            .as_ref()
            .ok_or_else(|| EmailError::NotConfigured {
                provider: PROVIDER.to_string(),
            })?;

        let body = PostmarkRequest {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html_body: &message.html_body,
            text_body: message.text_body.as_deref(),
            tag: message.template.as_deref(),
            message_stream: "outbound",
        };

        let response = self
            .client
            .post(format!("{}/email", self.base_url))
            .header(TOKEN_HEADER, token.expose_secret().as_str())
            .header(reqwest::header::ACCEPT, "application/json")
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

        let parsed: PostmarkResponse = response.json().await.map_err(|e| EmailError::Provider {
            provider: PROVIDER.to_string(),
            message: format!("invalid response: {}", e),
        })?;

        // Postmark reports some rejections with 200 and a non-zero ErrorCode.
        if parsed.error_code != 0 {
            return Err(EmailError::Rejected {
                provider: PROVIDER.to_string(),
                message: format!("{}: {}", parsed.error_code, parsed.message),
            });
        }

        Ok(SentEmail {
            provider: PROVIDER.to_string(),
            message_id: parsed.message_id,
        })
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
