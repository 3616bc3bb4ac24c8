//! ProcessEmailQueueHandler - Delivers due queued emails.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::email::QueuedEmail;
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{EmailQueue, EmailSender};

/// Limits for one queue run.
#[derive(Debug, Clone, Copy)]
pub struct QueueSettings {
    pub batch_size: u32,
    pub max_attempts: u32,
    /// How long a claimed row stays invisible to other runs. A failed
    /// attempt is retried once the lease runs out.
    pub lease: Duration,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            batch_size: 25,
            max_attempts: 3,
            lease: Duration::minutes(5),
        }
    }
}

/// Outcome counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ProcessQueueResult {
    pub claimed: usize,
    pub sent: usize,
    /// Failed this time, queued for another attempt.
    pub retrying: usize,
    /// Out of attempts.
    pub failed: usize,
}

/// Handler for one pass over the email queue.
///
/// Run by the background poller and by the admin trigger endpoint. Claims
/// are leased, so overlapping runs never send the same row twice.
pub struct ProcessEmailQueueHandler {
    queue: Arc<dyn EmailQueue>,
    sender: Arc<dyn EmailSender>,
    settings: QueueSettings,
}

impl ProcessEmailQueueHandler {
    pub fn new(
        queue: Arc<dyn EmailQueue>,
        sender: Arc<dyn EmailSender>,
        settings: QueueSettings,
    ) -> Self {
        Self {
            queue,
            sender,
            settings,
        }
    }

    pub async fn handle(&self) -> Result<ProcessQueueResult, DomainError> {
        let now = Timestamp::now();
        let claimed = self
            .queue
            .claim_due(
                now,
                now.plus(self.settings.lease),
                self.settings.batch_size,
                self.settings.max_attempts,
            )
            .await?;

        let mut result = ProcessQueueResult {
            claimed: claimed.len(),
            ..Default::default()
        };
        for email in claimed {
            match self.deliver(email).await {
                Ok(Delivery::Sent) => result.sent += 1,
                Ok(Delivery::Retrying) => result.retrying += 1,
                Ok(Delivery::Failed) => result.failed += 1,
                Err(e) => {
                    // The row stays leased and is retried when the lease ends.
                    tracing::error!(error = %e, "Failed to record email delivery outcome");
                }
            }
        }

        if result.claimed > 0 {
            tracing::info!(
                claimed = result.claimed,
                sent = result.sent,
                retrying = result.retrying,
                failed = result.failed,
                "Email queue processed"
            );
        }
        Ok(result)
    }

    async fn deliver(&self, mut email: QueuedEmail) -> Result<Delivery, DomainError> {
        let outcome = match self.sender.send(&email.message).await {
            Ok(sent) => {
                email.mark_sent(sent.provider, sent.message_id)?;
                Delivery::Sent
            }
            Err(e) => {
                let requeued = email.record_failure(e.to_string(), self.settings.max_attempts)?;
                tracing::warn!(
                    email_id = %email.id,
                    attempts = email.attempts,
                    requeued,
                    error = %e,
                    "Email delivery failed"
                );
                if requeued {
                    Delivery::Retrying
                } else {
                    Delivery::Failed
                }
            }
        };
        self.queue.update(&email).await?;
        Ok(outcome)
    }
}

enum Delivery {
    Sent,
    Retrying,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::MockEmailSender;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::email::{EmailMessage, EmailStatus};
    use crate::ports::EmailError;

    async fn queue(store: &InMemoryStore, to: &str) -> QueuedEmail {
        let email = QueuedEmail::enqueue(
            EmailMessage::new(to, "Results posted", "<p>See standings</p>").unwrap(),
            None,
        );
        store.enqueue(&email).await.unwrap();
        email
    }

    fn settings(max_attempts: u32) -> QueueSettings {
        QueueSettings {
            batch_size: 10,
            max_attempts,
            // Zero lease makes retried rows due again immediately.
            lease: Duration::zero(),
        }
    }

    #[tokio::test]
    async fn due_emails_are_sent() {
        let store = InMemoryStore::new();
        let email = queue(&store, "a@example.com").await;
        queue(&store, "b@example.com").await;
        let sender = Arc::new(MockEmailSender::new("resend"));

        let result = ProcessEmailQueueHandler::new(Arc::new(store.clone()), sender.clone(), settings(3))
            .handle()
            .await
            .unwrap();

        assert_eq!(
            result,
            ProcessQueueResult {
                claimed: 2,
                sent: 2,
                retrying: 0,
                failed: 0
            }
        );
        assert_eq!(sender.sent().len(), 2);
        let stored = store.find_by_id(&email.id).await.unwrap().unwrap();
        assert_eq!(stored.status, EmailStatus::Sent);
        assert_eq!(stored.provider.as_deref(), Some("resend"));
    }

    #[tokio::test]
    async fn failures_retry_until_max_attempts() {
        let store = InMemoryStore::new();
        let email = queue(&store, "a@example.com").await;
        let sender = Arc::new(MockEmailSender::new("resend").with_error(EmailError::RateLimited {
            provider: "resend".into(),
        }));
        let handler = ProcessEmailQueueHandler::new(Arc::new(store.clone()), sender, settings(2));

        let first = handler.handle().await.unwrap();
        assert_eq!(first.retrying, 1);
        let second = handler.handle().await.unwrap();
        assert_eq!(second.failed, 1);
        let third = handler.handle().await.unwrap();
        assert_eq!(third.claimed, 0);

        let stored = store.find_by_id(&email.id).await.unwrap().unwrap();
        assert_eq!(stored.status, EmailStatus::Failed);
        assert_eq!(stored.attempts, 2);
        assert!(stored.last_error.unwrap().contains("rate limited"));
    }

    #[tokio::test]
    async fn batch_size_limits_claims() {
        let store = InMemoryStore::new();
        for i in 0..3 {
            queue(&store, &format!("fan{}@example.com", i)).await;
        }
        let handler = ProcessEmailQueueHandler::new(
            Arc::new(store),
            Arc::new(MockEmailSender::default()),
            QueueSettings {
                batch_size: 2,
                ..settings(3)
            },
        );

        assert_eq!(handler.handle().await.unwrap().sent, 2);
        assert_eq!(handler.handle().await.unwrap().sent, 1);
    }
}
