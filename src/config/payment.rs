//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Stripe configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub stripe_api_key: String,

    /// Webhook signing secret
    pub stripe_webhook_secret: String,

    /// Lowercase ISO-4217 currency for registration fees
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl PaymentConfig {
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired(
                "PAYMENT__STRIPE_WEBHOOK_SECRET",
            ));
        }
        if !self.stripe_api_key.starts_with("sk_") && !self.stripe_api_key.starts_with("rk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::InvalidCurrency(self.currency.clone()));
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: String::new(),
            stripe_webhook_secret: String::new(),
            currency: default_currency(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PaymentConfig {
        PaymentConfig {
            stripe_api_key: "sk_test_51abc".to_string(),
            stripe_webhook_secret: "whsec_abc".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_config_passes() {
        let config = valid();
        assert!(config.validate().is_ok());
        assert!(config.is_test_mode());
    }

    #[test]
    fn publishable_key_is_rejected() {
        let config = PaymentConfig {
            stripe_api_key: "pk_test_51abc".to_string(),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidStripeKey));
    }

    #[test]
    fn webhook_secret_requires_prefix() {
        let config = PaymentConfig {
            stripe_webhook_secret: "secret".to_string(),
            ..valid()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidStripeWebhookSecret)
        );
    }

    #[test]
    fn uppercase_currency_is_rejected() {
        let config = PaymentConfig {
            currency: "USD".to_string(),
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidCurrency(_))
        ));
    }
}
