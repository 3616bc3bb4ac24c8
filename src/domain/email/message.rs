use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::registration::is_plausible_email;

/// A rendered email ready to hand to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
    /// Template tag, recorded for reporting.
    pub template: Option<String>,
}

impl EmailMessage {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let message = Self {
            to: to.into().trim().to_string(),
            subject: subject.into(),
            html_body: html_body.into(),
            text_body: None,
            template: None,
        };
        message.validate()?;
        Ok(message)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_body = Some(text.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_plausible_email(&self.to) {
            return Err(ValidationError::invalid_format("to", "not an email address"));
        }
        if self.subject.trim().is_empty() {
            return Err(ValidationError::empty_field("subject"));
        }
        if self.html_body.trim().is_empty() {
            return Err(ValidationError::empty_field("html_body"));
        }
        Ok(())
    }
}
