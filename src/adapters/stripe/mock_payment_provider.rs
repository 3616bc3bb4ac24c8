//! Mock payment provider for testing.
//!
//! Supports:
//! - Deterministic intent and refund ids
//! - Error injection per method
//! - Call tracking
//! - Webhook events decoded straight from the payload (no signature)

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CreatePaymentIntentRequest, CreateRefundRequest, PaymentError, PaymentIntent, PaymentMethod,
    PaymentProvider, ProviderRefund, Subscription, SubscriptionStatus, WebhookEvent,
};

/// Signature value the mock treats as valid.
pub const MOCK_WEBHOOK_SIGNATURE: &str = "t=0,v1=00";

/// Mock payment provider for testing.
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.fail_method("create_refund", PaymentError::network("timeout"));
/// let intent = mock.create_payment_intent(request).await?;
/// assert_eq!(mock.calls_to("create_payment_intent"), 1);
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    next_id: u32,
    subscriptions: HashMap<String, Subscription>,
    payment_methods: HashMap<String, Vec<PaymentMethod>>,
    method_errors: HashMap<String, PaymentError>,
    call_log: Vec<MethodCall>,
    reject_webhooks: bool,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that fails every webhook verification.
    pub fn rejecting_webhooks() -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().reject_webhooks = true;
        mock
    }

    pub fn add_subscription(&self, subscription: Subscription) {
        let id = subscription.id.clone();
        self.inner.lock().unwrap().subscriptions.insert(id, subscription);
    }

    pub fn add_payment_method(&self, customer_id: &str, method: PaymentMethod) {
        self.inner
            .lock()
            .unwrap()
            .payment_methods
            .entry(customer_id.to_string())
            .or_default()
            .push(method);
    }

    /// Makes every call to `method` fail with `error`.
    pub fn fail_method(&self, method: &str, error: PaymentError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Logs the call and returns the injected error, if any.
    fn record(&self, method: &str, args: Vec<String>) -> Result<u32, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
        if let Some(err) = state.method_errors.get(method) {
            return Err(err.clone());
        }
        state.next_id += 1;
        Ok(state.next_id)
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let n = self.record(
            "create_payment_intent",
            vec![
                request.registration_id.clone(),
                request.amount.cents().to_string(),
            ],
        )?;
        Ok(PaymentIntent {
            id: format!("pi_mock_{}", n),
            client_secret: format!("pi_mock_{}_secret", n),
            amount_cents: request.amount.cents(),
            currency: request.amount.currency().to_string(),
            status: "requires_payment_method".to_string(),
        })
    }

    async fn create_refund(
        &self,
        request: CreateRefundRequest,
    ) -> Result<ProviderRefund, PaymentError> {
        let n = self.record(
            "create_refund",
            vec![
                request.payment_intent_id.clone(),
                request.amount_cents.to_string(),
            ],
        )?;
        Ok(ProviderRefund {
            id: format!("re_mock_{}", n),
            amount_cents: request.amount_cents,
            status: "succeeded".to_string(),
        })
    }

    async fn update_subscription(
        &self,
        subscription_id: &str,
        price_id: &str,
    ) -> Result<Subscription, PaymentError> {
        self.record(
            "update_subscription",
            vec![subscription_id.to_string(), price_id.to_string()],
        )?;
        let mut state = self.inner.lock().unwrap();
        let sub = state
            .subscriptions
            .get_mut(subscription_id)
            .ok_or_else(|| PaymentError::not_found("Subscription"))?;
        sub.price_id = Some(price_id.to_string());
        Ok(sub.clone())
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<Subscription, PaymentError> {
        self.record(
            "cancel_subscription",
            vec![subscription_id.to_string(), at_period_end.to_string()],
        )?;
        let mut state = self.inner.lock().unwrap();
        let sub = state
            .subscriptions
            .get_mut(subscription_id)
            .ok_or_else(|| PaymentError::not_found("Subscription"))?;
        if at_period_end {
            sub.cancel_at_period_end = true;
        } else {
            sub.status = SubscriptionStatus::Canceled;
        }
        Ok(sub.clone())
    }

    async fn list_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<PaymentMethod>, PaymentError> {
        self.record("list_payment_methods", vec![customer_id.to_string()])?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .payment_methods
            .get(customer_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        self.record("verify_webhook", vec![signature.to_string()])?;
        if self.inner.lock().unwrap().reject_webhooks || signature != MOCK_WEBHOOK_SIGNATURE {
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }
        serde_json::from_slice(payload)
            .map_err(|e| PaymentError::invalid_webhook(format!("Invalid JSON: {}", e)))
    }
}
