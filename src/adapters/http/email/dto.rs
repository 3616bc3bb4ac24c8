//! Request and response DTOs for email endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::email::EmailMessage;
use crate::domain::foundation::Timestamp;
use crate::ports::SentEmail;

#[derive(Debug, Clone, Deserialize)]
pub struct EnqueueEmailRequest {
    #[serde(flatten)]
    pub message: EmailMessage,
    pub scheduled_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentEmailResponse {
    pub provider: String,
    pub message_id: String,
}

impl From<SentEmail> for SentEmailResponse {
    fn from(sent: SentEmail) -> Self {
        Self {
            provider: sent.provider,
            message_id: sent.message_id,
        }
    }
}
