//! Email sender port for transactional email providers.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::email::EmailMessage;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Delivers one message through an email provider.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<SentEmail, EmailError>;

    fn provider_name(&self) -> &str;
}

/// Provider acknowledgement of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub provider: String,
    pub message_id: String,
}

/// Errors from email provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("{provider}: API key not configured")]
    NotConfigured { provider: String },

    #[error("{provider}: authentication failed")]
    AuthenticationFailed { provider: String },

    #[error("{provider}: rate limited")]
    RateLimited { provider: String },

    /// The provider refused the message itself (bad recipient, blocked sender).
    #[error("{provider}: message rejected: {message}")]
    Rejected { provider: String, message: String },

    #[error("{provider}: network error: {message}")]
    Network { provider: String, message: String },

    #[error("{provider}: provider error: {message}")]
    Provider { provider: String, message: String },
}

impl EmailError {
    /// Whether a secondary provider might succeed where this one failed.
    ///
    /// A rejected message would be rejected everywhere.
    pub fn should_fall_back(&self) -> bool {
        !matches!(self, EmailError::Rejected { .. })
    }
}

impl From<EmailError> for DomainError {
    fn from(err: EmailError) -> Self {
        DomainError::new(ErrorCode::EmailDeliveryFailed, err.to_string())
    }
}
