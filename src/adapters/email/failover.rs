//! Email sender with automatic failover to a secondary provider.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::email::EmailMessage;
use crate::ports::{EmailError, EmailSender, SentEmail};

/// Sends through the primary; on any failure other than a rejection, retries
/// once through the secondary if one is configured.
pub struct FailoverEmailSender {
    primary: Arc<dyn EmailSender>,
    secondary: Option<Arc<dyn EmailSender>>,
}

impl FailoverEmailSender {
    pub fn new(primary: Arc<dyn EmailSender>) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub fn with_secondary(mut self, secondary: Arc<dyn EmailSender>) -> Self {
        self.secondary = Some(secondary);
        self
    }
}

#[async_trait]
impl EmailSender for FailoverEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<SentEmail, EmailError> {
        let err = match self.primary.send(message).await {
            Ok(sent) => return Ok(sent),
            Err(err) => err,
        };
        match &self.secondary {
            Some(secondary) if err.should_fall_back() => {
                tracing::warn!(
                    primary = self.primary.provider_name(),
                    secondary = secondary.provider_name(),
                    error = %err,
                    "Email provider failed, using secondary"
                );
                secondary.send(message).await
            }
            _ => Err(err),
        }
    }

    fn provider_name(&self) -> &str {
        self.primary.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::MockEmailSender;

    fn message() -> EmailMessage {
        EmailMessage::new("competitor@example.com", "Receipt", "<p>Paid</p>").unwrap()
    }

    #[tokio::test]
    async fn primary_success_does_not_touch_secondary() {
        let secondary = Arc::new(MockEmailSender::new("postmark"));
        let sender = FailoverEmailSender::new(Arc::new(MockEmailSender::new("resend")))
            .with_secondary(secondary.clone());

        let sent = sender.send(&message()).await.unwrap();
        assert_eq!(sent.provider, "resend");
        assert!(secondary.sent().is_empty());
    }

    #[tokio::test]
    async fn rate_limited_primary_uses_secondary() {
        let secondary = Arc::new(MockEmailSender::new("postmark"));
        let sender = FailoverEmailSender::new(Arc::new(
            MockEmailSender::new("resend").with_error(EmailError::RateLimited {
                provider: "resend".into(),
            }),
        ))
        .with_secondary(secondary.clone());

        let sent = sender.send(&message()).await.unwrap();
        assert_eq!(sent.provider, "postmark");
        assert_eq!(secondary.sent().len(), 1);
    }

    #[tokio::test]
    async fn rejection_is_not_retried() {
        let secondary = Arc::new(MockEmailSender::new("postmark"));
        let sender = FailoverEmailSender::new(Arc::new(
            MockEmailSender::new("resend").with_error(EmailError::Rejected {
                provider: "resend".into(),
                message: "suppressed recipient".into(),
            }),
        ))
        .with_secondary(secondary.clone());

        assert!(matches!(
            sender.send(&message()).await,
            Err(EmailError::Rejected { .. })
        ));
        assert!(secondary.sent().is_empty());
    }

    #[tokio::test]
    async fn without_secondary_error_is_returned() {
        let sender = FailoverEmailSender::new(Arc::new(
            MockEmailSender::new("resend").with_error(EmailError::NotConfigured {
                provider: "resend".into(),
            }),
        ));
        assert!(sender.send(&message()).await.is_err());
    }
}
