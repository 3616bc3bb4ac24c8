//! In-memory email sender for tests.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::email::EmailMessage;
use crate::ports::{EmailError, EmailSender, SentEmail};

/// Records every accepted message. A forced error fails every send.
#[derive(Debug)]
pub struct MockEmailSender {
    name: String,
    sent: RwLock<Vec<EmailMessage>>,
    force_error: RwLock<Option<EmailError>>,
}

impl MockEmailSender {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sent: RwLock::new(Vec::new()),
            force_error: RwLock::new(None),
        }
    }

    pub fn with_error(self, error: EmailError) -> Self {
        self.set_error(Some(error));
        self
    }

    pub fn set_error(&self, error: Option<EmailError>) {
        *self.force_error.write().unwrap() = error;
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.read().unwrap().clone()
    }
}

impl Default for MockEmailSender {
    fn default() -> Self {
        Self::new("mock")
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<SentEmail, EmailError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }
        let mut sent = self.sent.write().unwrap();
        sent.push(message.clone());
        Ok(SentEmail {
            provider: self.name.clone(),
            message_id: format!("{}-{}", self.name, sent.len()),
        })
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
