//! Persistent email queue entries.
//!
//! The poller claims due `pending` rows (incrementing `attempts`), hands each one to
//! the sender and records the outcome. Failures go back to `pending` until the
//! attempt budget is spent.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{str_enum, DomainError, EmailId, StateMachine, Timestamp};

use super::EmailMessage;

/// Recorded on rows whose leases ran out on every allowed attempt.
pub const ATTEMPTS_EXHAUSTED: &str = "delivery attempts exhausted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailStatus {
    Pending,
    Sent,
    Failed,
}

str_enum!(EmailStatus {
    Pending => "pending",
    Sent => "sent",
    Failed => "failed",
});

impl StateMachine for EmailStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use EmailStatus::*;
        matches!(
            (self, target),
            (Pending, Sent) | (Pending, Failed) | (Failed, Pending)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use EmailStatus::*;
        match self {
            Pending => vec![Sent, Failed],
            Failed => vec![Pending],
            Sent => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedEmail {
    pub id: EmailId,
    #[serde(flatten)]
    pub message: EmailMessage,
    pub status: EmailStatus,
    /// Delivery attempts so far, counted at claim time.
    pub attempts: u32,
    pub last_error: Option<String>,
    pub provider: Option<String>,
    pub provider_message_id: Option<String>,
    /// Not sent before this instant.
    pub scheduled_at: Timestamp,
    pub sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl QueuedEmail {
    pub fn enqueue(message: EmailMessage, scheduled_at: Option<Timestamp>) -> Self {
        let now = Timestamp::now();
        Self {
            id: EmailId::new(),
            message,
            status: EmailStatus::Pending,
            attempts: 0,
            last_error: None,
            provider: None,
            provider_message_id: None,
            scheduled_at: scheduled_at.unwrap_or(now),
            sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.status == EmailStatus::Pending && self.scheduled_at <= now
    }

    /// Counts one delivery attempt.
    pub fn claim(&mut self) {
        self.attempts += 1;
        self.updated_at = Timestamp::now();
    }

    pub fn mark_sent(
        &mut self,
        provider: impl Into<String>,
        provider_message_id: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.status = self.status.transition_to(EmailStatus::Sent)?;
        let now = Timestamp::now();
        self.provider = Some(provider.into());
        self.provider_message_id = Some(provider_message_id.into());
        self.last_error = None;
        self.sent_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Records a failed attempt. Returns `true` when the email was put back
    /// in the queue for another try.
    pub fn record_failure(
        &mut self,
        error: impl Into<String>,
        max_attempts: u32,
    ) -> Result<bool, DomainError> {
        self.status = self.status.transition_to(EmailStatus::Failed)?;
        self.last_error = Some(error.into());
        self.updated_at = Timestamp::now();
        if self.attempts < max_attempts {
            self.status = self.status.transition_to(EmailStatus::Pending)?;
            return Ok(true);
        }
        Ok(false)
    }
}
