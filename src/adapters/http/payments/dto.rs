//! Request and response DTOs for payment endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::payments::{
    HandlePaymentWebhookResult, RefundPaymentResult, SubscriptionChange,
};
use crate::domain::foundation::{PaymentId, RegistrationId};
use crate::domain::payment::{Payment, Refund};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefundRequest {
    /// Omitted refunds the remaining balance.
    pub amount_cents: Option<i64>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefundResponse {
    pub payment: Payment,
    pub refund: Refund,
}

impl From<RefundPaymentResult> for RefundResponse {
    fn from(result: RefundPaymentResult) -> Self {
        Self {
            payment: result.payment,
            refund: result.refund,
        }
    }
}

/// Body of `POST /api/subscriptions`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SubscriptionRequest {
    ChangePrice {
        price_id: String,
    },
    Cancel {
        #[serde(default = "default_at_period_end")]
        at_period_end: bool,
    },
}

fn default_at_period_end() -> bool {
    true
}

impl From<SubscriptionRequest> for SubscriptionChange {
    fn from(req: SubscriptionRequest) -> Self {
        match req {
            SubscriptionRequest::ChangePrice { price_id } => Self::ChangePrice { price_id },
            SubscriptionRequest::Cancel { at_period_end } => Self::Cancel { at_period_end },
        }
    }
}

/// Acknowledgement returned to the processor.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub received: bool,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<PaymentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<RegistrationId>,
}

impl From<HandlePaymentWebhookResult> for WebhookResponse {
    fn from(result: HandlePaymentWebhookResult) -> Self {
        let (outcome, payment_id, registration_id) = match result {
            HandlePaymentWebhookResult::PaymentSucceeded {
                payment_id,
                registration_id,
            } => ("payment_succeeded", Some(payment_id), Some(registration_id)),
            HandlePaymentWebhookResult::PaymentFailed { payment_id } => {
                ("payment_failed", Some(payment_id), None)
            }
            HandlePaymentWebhookResult::RefundReconciled { payment_id, .. } => {
                ("refund_reconciled", Some(payment_id), None)
            }
            HandlePaymentWebhookResult::AlreadyApplied => ("already_applied", None, None),
            HandlePaymentWebhookResult::Ignored => ("ignored", None, None),
        };
        Self {
            received: true,
            outcome,
            payment_id,
            registration_id,
        }
    }
}
