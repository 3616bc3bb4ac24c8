//! Payment provider port for external payment processing.
//!
//! Defines the contract for the card processor integration (Stripe). Entry fees
//! are collected through payment intents confirmed client-side; business accounts
//! hold subscriptions managed through the same provider.
//!
//! # Design
//!
//! - **Gateway agnostic**: interface works with any payment provider
//! - **Idempotent**: intent and refund creation accept an idempotency key
//! - **Webhook driven**: settlement arrives through verified webhook events

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, Money};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment intent the client confirms with card details.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Refund part or all of a captured payment intent.
    async fn create_refund(&self, request: CreateRefundRequest)
        -> Result<ProviderRefund, PaymentError>;

    /// Move a subscription to a different price.
    async fn update_subscription(
        &self,
        subscription_id: &str,
        price_id: &str,
    ) -> Result<Subscription, PaymentError>;

    /// Cancel a subscription.
    ///
    /// If `at_period_end` is true, the subscription stays active until the period ends.
    async fn cancel_subscription(
        &self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<Subscription, PaymentError>;

    /// Saved cards for a customer.
    async fn list_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<PaymentMethod>, PaymentError>;

    /// Verify a webhook signature and parse the event.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError>;
}

/// Request to create a payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentIntentRequest {
    pub amount: Money,
    /// Provider customer to attach saved cards to.
    pub customer_id: Option<String>,
    pub receipt_email: Option<String>,
    pub description: String,
    /// Echoed back in webhook payloads.
    pub registration_id: String,
    pub idempotency_key: Option<String>,
}

/// Payment intent in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's intent ID (`pi_...`).
    pub id: String,
    /// Secret the browser uses to confirm the intent.
    pub client_secret: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
}

/// Request to refund a payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRefundRequest {
    pub payment_intent_id: String,
    pub amount_cents: i64,
    pub reason: Option<String>,
    pub idempotency_key: Option<String>,
}

/// Refund in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRefund {
    /// Provider's refund ID (`re_...`).
    pub id: String,
    pub amount_cents: i64,
    pub status: String,
}

/// Subscription in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub customer_id: String,
    pub status: SubscriptionStatus,
    pub price_id: Option<String>,
    /// Current billing period end (Unix timestamp).
    pub current_period_end: i64,
    pub cancel_at_period_end: bool,
}

/// Subscription status from payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
    Trialing,
    Incomplete,
    IncompleteExpired,
    Unpaid,
    Paused,
    Unknown,
}

impl SubscriptionStatus {
    /// Maps the provider's status string.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "active" => SubscriptionStatus::Active,
            "past_due" => SubscriptionStatus::PastDue,
            "canceled" => SubscriptionStatus::Canceled,
            "trialing" => SubscriptionStatus::Trialing,
            "incomplete" => SubscriptionStatus::Incomplete,
            "incomplete_expired" => SubscriptionStatus::IncompleteExpired,
            "unpaid" => SubscriptionStatus::Unpaid,
            "paused" => SubscriptionStatus::Paused,
            _ => SubscriptionStatus::Unknown,
        }
    }
}

/// A saved card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub brand: String,
    pub last4: String,
    pub exp_month: u32,
    pub exp_year: u32,
}

/// Webhook event from payment provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider.
    pub id: String,
    pub event_type: WebhookEventType,
    pub data: WebhookEventData,
    /// When the event occurred (Unix timestamp).
    pub created_at: i64,
}

/// Types of webhook events we handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    PaymentIntentSucceeded,
    PaymentIntentFailed,
    ChargeRefunded,
    /// Acknowledged and ignored.
    Unknown(String),
}

impl WebhookEventType {
    pub fn from_provider(event_type: &str) -> Self {
        match event_type {
            "payment_intent.succeeded" => WebhookEventType::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => WebhookEventType::PaymentIntentFailed,
            "charge.refunded" => WebhookEventType::ChargeRefunded,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }
}

/// Webhook event payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WebhookEventData {
    #[serde(rename = "payment_intent")]
    PaymentIntent {
        intent_id: String,
        amount_cents: i64,
        currency: String,
        /// Decline message on failed attempts.
        failure_message: Option<String>,
    },

    #[serde(rename = "charge")]
    Charge {
        charge_id: String,
        payment_intent_id: Option<String>,
        /// Cumulative refunded amount on the charge.
        amount_refunded_cents: i64,
    },

    #[serde(rename = "raw")]
    Raw { json: String },
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
    /// Provider's error code (if available).
    pub provider_code: Option<String>,
    pub retryable: bool,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::CardDeclined, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::InvalidWebhook => ErrorCode::InvalidWebhookSignature,
            _ => ErrorCode::PaymentProviderError,
        };
        let mut domain = DomainError::new(code, err.message)
            .with_detail("payment_error", err.code.to_string());
        if let Some(provider_code) = err.provider_code {
            domain = domain.with_detail("provider_code", provider_code);
        }
        domain
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    NetworkError,
    AuthenticationError,
    CardDeclined,
    InsufficientFunds,
    NotFound,
    RateLimitExceeded,
    /// Invalid webhook signature or payload.
    InvalidWebhook,
    ProviderError,
    Unknown,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::InsufficientFunds => "insufficient_funds",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
