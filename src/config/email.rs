//! Email configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Outgoing email providers
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailProviderKind {
    #[default]
    Resend,
    Postmark,
}

/// Email delivery and queue configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Provider tried first; the other one is the fallback when configured
    #[serde(default)]
    pub primary_provider: EmailProviderKind,

    pub resend_api_key: Option<String>,

    pub postmark_server_token: Option<String>,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Emails claimed per queue run
    #[serde(default = "default_batch_size")]
    pub queue_batch_size: u32,

    /// Attempts before a queued email stays failed
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Background poll interval. 0 disables the poller.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl EmailConfig {
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        (self.poll_interval_secs > 0).then(|| Duration::from_secs(self.poll_interval_secs))
    }

    fn key_for(&self, kind: EmailProviderKind) -> Option<&str> {
        match kind {
            EmailProviderKind::Resend => self.resend_api_key.as_deref(),
            EmailProviderKind::Postmark => self.postmark_server_token.as_deref(),
        }
        .filter(|k| !k.is_empty())
    }

    /// Secondary provider, present only when its credentials are configured.
    pub fn secondary_provider(&self) -> Option<EmailProviderKind> {
        let secondary = match self.primary_provider {
            EmailProviderKind::Resend => EmailProviderKind::Postmark,
            EmailProviderKind::Postmark => EmailProviderKind::Resend,
        };
        self.key_for(secondary).map(|_| secondary)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key_for(self.primary_provider).is_none() {
            return Err(match self.primary_provider {
                EmailProviderKind::Resend => {
                    ValidationError::MissingRequired("EMAIL__RESEND_API_KEY")
                }
                EmailProviderKind::Postmark => {
                    ValidationError::MissingRequired("EMAIL__POSTMARK_SERVER_TOKEN")
                }
            });
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if self.queue_batch_size == 0 || self.queue_batch_size > 500 {
            return Err(ValidationError::InvalidBatchSize);
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidMaxAttempts);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            primary_provider: EmailProviderKind::default(),
            resend_api_key: None,
            postmark_server_token: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
            queue_batch_size: default_batch_size(),
            max_attempts: default_max_attempts(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@caraudioevents.com".to_string()
}

fn default_from_name() -> String {
    "Car Audio Events".to_string()
}

fn default_batch_size() -> u32 {
    25
}

fn default_max_attempts() -> u32 {
    3
}

fn default_poll_interval() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_header_formats_name_and_address() {
        let config = EmailConfig::default();
        assert_eq!(
            config.from_header(),
            "Car Audio Events <noreply@caraudioevents.com>"
        );
    }

    #[test]
    fn primary_key_is_required() {
        let config = EmailConfig {
            primary_provider: EmailProviderKind::Postmark,
            resend_api_key: Some("re_123".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("EMAIL__POSTMARK_SERVER_TOKEN"))
        );
    }

    #[test]
    fn secondary_only_when_credentials_present() {
        let mut config = EmailConfig {
            resend_api_key: Some("re_123".to_string()),
            ..Default::default()
        };
        assert_eq!(config.secondary_provider(), None);

        config.postmark_server_token = Some("pm-token".to_string());
        assert_eq!(config.secondary_provider(), Some(EmailProviderKind::Postmark));
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let config = EmailConfig {
            resend_api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn batch_size_bounds_are_enforced() {
        let config = EmailConfig {
            resend_api_key: Some("re_123".to_string()),
            queue_batch_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidBatchSize));
    }

    #[test]
    fn zero_poll_interval_disables_poller() {
        let config = EmailConfig {
            poll_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.poll_interval().is_none());
    }
}
