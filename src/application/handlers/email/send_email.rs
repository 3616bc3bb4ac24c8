//! Admin email operations: direct send and enqueue.

use std::sync::Arc;

use crate::application::Actor;
use crate::domain::email::{EmailMessage, QueuedEmail};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{EmailQueue, EmailSender, SentEmail};

#[derive(Debug, Clone)]
pub struct SendEmailCommand {
    pub actor: Actor,
    pub message: EmailMessage,
}

/// Sends immediately through the configured provider chain, bypassing the queue.
pub struct SendEmailHandler {
    sender: Arc<dyn EmailSender>,
}

impl SendEmailHandler {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }

    pub async fn handle(&self, cmd: SendEmailCommand) -> Result<SentEmail, DomainError> {
        cmd.actor.ensure_admin()?;
        cmd.message.validate()?;
        let sent = self.sender.send(&cmd.message).await?;
        tracing::info!(
            provider = %sent.provider,
            message_id = %sent.message_id,
            "Email sent directly"
        );
        Ok(sent)
    }
}

#[derive(Debug, Clone)]
pub struct EnqueueEmailCommand {
    pub actor: Actor,
    pub message: EmailMessage,
    /// Not delivered before this instant. Defaults to now.
    pub scheduled_at: Option<Timestamp>,
}

pub struct EnqueueEmailHandler {
    queue: Arc<dyn EmailQueue>,
}

impl EnqueueEmailHandler {
    pub fn new(queue: Arc<dyn EmailQueue>) -> Self {
        Self { queue }
    }

    pub async fn handle(&self, cmd: EnqueueEmailCommand) -> Result<QueuedEmail, DomainError> {
        cmd.actor.ensure_admin()?;
        cmd.message.validate()?;
        let email = QueuedEmail::enqueue(cmd.message, cmd.scheduled_at);
        self.queue.enqueue(&email).await?;
        Ok(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::MockEmailSender;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{admin, competitor};
    use crate::domain::foundation::ErrorCode;
    use crate::ports::EmailError;

    fn message() -> EmailMessage {
        EmailMessage::new("crew@example.com", "Load-in times", "<p>Gates open 7am</p>").unwrap()
    }

    #[tokio::test]
    async fn admin_sends_directly() {
        let sender = Arc::new(MockEmailSender::new("resend"));
        let sent = SendEmailHandler::new(sender.clone())
            .handle(SendEmailCommand {
                actor: admin(),
                message: message(),
            })
            .await
            .unwrap();
        assert_eq!(sent.provider, "resend");
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_delivery_error() {
        let sender = Arc::new(MockEmailSender::new("resend").with_error(EmailError::Network {
            provider: "resend".into(),
            message: "reset".into(),
        }));
        let err = SendEmailHandler::new(sender)
            .handle(SendEmailCommand {
                actor: admin(),
                message: message(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmailDeliveryFailed);
    }

    #[tokio::test]
    async fn only_admins_enqueue() {
        let store = InMemoryStore::new();
        let handler = EnqueueEmailHandler::new(Arc::new(store.clone()));

        let err = handler
            .handle(EnqueueEmailCommand {
                actor: competitor("fan-1"),
                message: message(),
                scheduled_at: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        handler
            .handle(EnqueueEmailCommand {
                actor: admin(),
                message: message(),
                scheduled_at: None,
            })
            .await
            .unwrap();
        assert_eq!(store.queued_emails().await.len(), 1);
    }
}
