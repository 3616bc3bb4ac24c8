//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port: payment intents for entry fees,
//! refunds, subscription changes for business accounts, saved cards, and
//! webhook verification.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::ports::{
    CreatePaymentIntentRequest, CreateRefundRequest, PaymentError, PaymentErrorCode,
    PaymentIntent, PaymentMethod, PaymentProvider, ProviderRefund, Subscription,
    SubscriptionStatus, WebhookEvent, WebhookEventData, WebhookEventType,
};

use super::webhook_types::{
    hex_encode, SignatureHeader, StripeCharge, StripeErrorBody, StripeList, StripePaymentIntent,
    StripePaymentMethod, StripeRefund, StripeSubscription, StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    api_base_url: String,

    /// Reject test-mode events (production only).
    require_livemode: bool,
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            require_livemode: false,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }
}

pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder, idempotency_key: Option<&str>) -> RequestBuilder {
        let builder =
            builder.basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None);
        match idempotency_key {
            Some(key) => builder.header("Idempotency-Key", key),
            None => builder,
        }
    }

    /// Sends a request and decodes a success body, mapping Stripe errors.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<T, PaymentError> {
        let response = builder
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            let err = error_from_response(response).await;
            tracing::error!(
                operation,
                code = %err.code,
                provider_code = ?err.provider_code,
                "Stripe request failed"
            );
            return Err(err);
        }

        response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }

    /// Verify webhook signature using HMAC-SHA256.
    fn verify_signature(
        &self,
        payload: &[u8],
        header: &SignatureHeader,
    ) -> Result<(), PaymentError> {
        let now = chrono::Utc::now().timestamp();
        let age = now - header.timestamp;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                age_secs = age,
                "Webhook event too old - possible replay attack"
            );
            return Err(PaymentError::invalid_webhook(format!(
                "Event too old ({} seconds)",
                age
            )));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                "Webhook event from future - clock skew or manipulation"
            );
            return Err(PaymentError::invalid_webhook("Event timestamp in future"));
        }

        let mut mac =
            HmacSha256::new_from_slice(self.config.webhook_secret.expose_secret().as_bytes())
                .map_err(|_| PaymentError::invalid_webhook("Unusable webhook secret"))?;
        mac.update(header.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        let expected = mac.finalize().into_bytes();

        let matched = header
            .v1_signatures
            .iter()
            .any(|provided| bool::from(expected.as_slice().ct_eq(provided.as_slice())));

        if !matched {
            tracing::warn!(
                expected_signature = hex_encode(expected.as_slice()),
                "Invalid webhook signature"
            );
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }

        Ok(())
    }

    fn parse_event(&self, payload: &[u8]) -> Result<WebhookEvent, PaymentError> {
        let stripe_event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse webhook payload");
            PaymentError::invalid_webhook(format!("Invalid JSON: {}", e))
        })?;

        if self.config.require_livemode && !stripe_event.livemode {
            tracing::warn!(
                event_id = %stripe_event.id,
                "Rejected test mode event in production"
            );
            return Err(PaymentError::invalid_webhook(
                "Test mode events not allowed in production",
            ));
        }

        let event_type = WebhookEventType::from_provider(&stripe_event.event_type);
        let data = extract_event_data(&stripe_event)?;

        Ok(WebhookEvent {
            id: stripe_event.id,
            event_type,
            data,
            created_at: stripe_event.created,
        })
    }
}

fn extract_event_data(event: &StripeWebhookEvent) -> Result<WebhookEventData, PaymentError> {
    match event.event_type.as_str() {
        s if s.starts_with("payment_intent.") => {
            let intent: StripePaymentIntent = serde_json::from_value(event.data.object.clone())
                .map_err(|e| {
                    PaymentError::invalid_webhook(format!("Invalid payment intent: {}", e))
                })?;
            Ok(WebhookEventData::PaymentIntent {
                intent_id: intent.id,
                amount_cents: intent.amount,
                currency: intent.currency,
                failure_message: intent.last_payment_error.and_then(|e| e.message),
            })
        }

        s if s.starts_with("charge.") => {
            let charge: StripeCharge = serde_json::from_value(event.data.object.clone())
                .map_err(|e| PaymentError::invalid_webhook(format!("Invalid charge: {}", e)))?;
            Ok(WebhookEventData::Charge {
                charge_id: charge.id,
                payment_intent_id: charge.payment_intent,
                amount_refunded_cents: charge.amount_refunded,
            })
        }

        _ => Ok(WebhookEventData::Raw {
            json: serde_json::to_string(&event.data.object).unwrap_or_default(),
        }),
    }
}

/// Maps a non-2xx Stripe response onto a `PaymentError`.
async fn error_from_response(response: Response) -> PaymentError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<StripeErrorBody>(&text).ok();
    map_stripe_error(status, body, text)
}

fn map_stripe_error(status: StatusCode, body: Option<StripeErrorBody>, raw: String) -> PaymentError {
    let (message, code, decline_code, error_type) = match body {
        Some(body) => (
            body.error.message.unwrap_or_else(|| raw.clone()),
            body.error.code,
            body.error.decline_code,
            body.error.error_type,
        ),
        None => (raw, None, None, String::new()),
    };

    let error_code = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PaymentErrorCode::AuthenticationError,
        StatusCode::NOT_FOUND => PaymentErrorCode::NotFound,
        StatusCode::TOO_MANY_REQUESTS => PaymentErrorCode::RateLimitExceeded,
        _ if error_type == "card_error" => {
            if decline_code.as_deref() == Some("insufficient_funds") {
                PaymentErrorCode::InsufficientFunds
            } else {
                PaymentErrorCode::CardDeclined
            }
        }
        s if s.is_server_error() => PaymentErrorCode::NetworkError,
        _ => PaymentErrorCode::ProviderError,
    };

    let err = PaymentError::new(error_code, format!("Stripe API error: {}", message));
    match decline_code.or(code) {
        Some(provider_code) => err.with_provider_code(provider_code),
        None => err,
    }
}

fn to_subscription(sub: StripeSubscription) -> Subscription {
    let price_id = sub.price_id();
    Subscription {
        status: SubscriptionStatus::from_provider(&sub.status),
        id: sub.id,
        customer_id: sub.customer,
        price_id,
        current_period_end: sub.current_period_end,
        cancel_at_period_end: sub.cancel_at_period_end,
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let mut params = vec![
            ("amount", request.amount.cents().to_string()),
            ("currency", request.amount.currency().to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
            ("description", request.description.clone()),
            ("metadata[registration_id]", request.registration_id.clone()),
        ];
        if let Some(customer) = &request.customer_id {
            params.push(("customer", customer.clone()));
        }
        if let Some(email) = &request.receipt_email {
            params.push(("receipt_email", email.clone()));
        }

        let builder = self.authorized(
            self.http_client.post(self.url("payment_intents")).form(&params),
            request.idempotency_key.as_deref(),
        );
        let intent: StripePaymentIntent = self.execute("create_payment_intent", builder).await?;

        let client_secret = intent
            .client_secret
            .ok_or_else(|| PaymentError::provider("Payment intent has no client secret"))?;

        tracing::info!(
            intent_id = %intent.id,
            registration_id = %request.registration_id,
            amount_cents = intent.amount,
            "Payment intent created"
        );

        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
            amount_cents: intent.amount,
            currency: intent.currency,
            status: intent.status,
        })
    }

    async fn create_refund(
        &self,
        request: CreateRefundRequest,
    ) -> Result<ProviderRefund, PaymentError> {
        let mut params = vec![
            ("payment_intent", request.payment_intent_id.clone()),
            ("amount", request.amount_cents.to_string()),
            ("reason", "requested_by_customer".to_string()),
        ];
        if let Some(reason) = &request.reason {
            params.push(("metadata[reason]", reason.clone()));
        }

        let builder = self.authorized(
            self.http_client.post(self.url("refunds")).form(&params),
            request.idempotency_key.as_deref(),
        );
        let refund: StripeRefund = self.execute("create_refund", builder).await?;

        Ok(ProviderRefund {
            id: refund.id,
            amount_cents: refund.amount,
            status: refund.status,
        })
    }

    async fn update_subscription(
        &self,
        subscription_id: &str,
        price_id: &str,
    ) -> Result<Subscription, PaymentError> {
        let path = format!("subscriptions/{}", subscription_id);

        let current: StripeSubscription = self
            .execute(
                "get_subscription",
                self.authorized(self.http_client.get(self.url(&path)), None),
            )
            .await?;
        let item_id = current
            .first_item_id()
            .ok_or_else(|| PaymentError::not_found("Subscription item"))?
            .to_string();

        let params = [
            ("items[0][id]", item_id),
            ("items[0][price]", price_id.to_string()),
            ("proration_behavior", "create_prorations".to_string()),
        ];
        let builder = self.authorized(self.http_client.post(self.url(&path)).form(&params), None);
        let updated: StripeSubscription = self.execute("update_subscription", builder).await?;

        Ok(to_subscription(updated))
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<Subscription, PaymentError> {
        let url = self.url(&format!("subscriptions/{}", subscription_id));

        let builder = if at_period_end {
            self.http_client
                .post(url)
                .form(&[("cancel_at_period_end", "true")])
        } else {
            self.http_client.delete(url)
        };
        let sub: StripeSubscription = self
            .execute("cancel_subscription", self.authorized(builder, None))
            .await?;

        Ok(to_subscription(sub))
    }

    async fn list_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<PaymentMethod>, PaymentError> {
        let builder = self.authorized(
            self.http_client
                .get(self.url("payment_methods"))
                .query(&[("customer", customer_id), ("type", "card")]),
            None,
        );
        let list: StripeList<StripePaymentMethod> =
            self.execute("list_payment_methods", builder).await?;

        Ok(list
            .data
            .into_iter()
            .filter_map(|pm| {
                pm.card.map(|card| PaymentMethod {
                    id: pm.id,
                    brand: card.brand,
                    last4: card.last4,
                    exp_month: card.exp_month,
                    exp_year: card.exp_year,
                })
            })
            .collect())
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        let header = SignatureHeader::parse(signature).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse Stripe-Signature header");
            PaymentError::invalid_webhook(e.to_string())
        })?;

        self.verify_signature(payload, &header)?;

        let event = self.parse_event(payload)?;

        tracing::info!(
            event_id = %event.id,
            event_type = ?event.event_type,
            "Webhook signature verified"
        );

        Ok(event)
    }
}

/// Builds a `Stripe-Signature` header value the way Stripe signs payloads.
#[cfg(test)]
fn sign_test_payload(secret: &str, timestamp: i64, payload: &str) -> String {
    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(signed_payload.as_bytes());
    let result = mac.finalize().into_bytes();

    format!("t={},v1={}", timestamp, hex_encode(&result))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn adapter() -> StripePaymentAdapter {
        StripePaymentAdapter::new(StripeConfig::new("sk_test_key", SECRET))
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    #[test]
    fn config_new_sets_defaults() {
        let config = StripeConfig::new("api_key", "webhook_secret");
        assert_eq!(config.api_base_url, "https://api.stripe.com");
        assert!(!config.require_livemode);
    }

    #[test]
    fn urls_use_versioned_base() {
        let adapter = StripePaymentAdapter::new(
            StripeConfig::new("k", "s").with_base_url("http://localhost:12111/"),
        );
        assert_eq!(
            adapter.url("payment_intents"),
            "http://localhost:12111/v1/payment_intents"
        );
    }

    #[test]
    fn verify_signature_valid() {
        let payload = r#"{"id":"evt_test"}"#;
        let header = SignatureHeader::parse(&sign_test_payload(SECRET, now(), payload)).unwrap();
        assert!(adapter().verify_signature(payload.as_bytes(), &header).is_ok());
    }

    #[test]
    fn verify_signature_wrong_secret() {
        let payload = r#"{"id":"evt_test"}"#;
        let header =
            SignatureHeader::parse(&sign_test_payload("wrong_secret", now(), payload)).unwrap();
        let err = adapter()
            .verify_signature(payload.as_bytes(), &header)
            .unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidWebhook);
    }

    #[test]
    fn verify_signature_tampered_payload() {
        let header =
            SignatureHeader::parse(&sign_test_payload(SECRET, now(), r#"{"amount":1}"#)).unwrap();
        assert!(adapter()
            .verify_signature(br#"{"amount":9999}"#, &header)
            .is_err());
    }

    #[test]
    fn verify_signature_expired_timestamp() {
        let payload = r#"{"id":"evt_test"}"#;
        let header =
            SignatureHeader::parse(&sign_test_payload(SECRET, now() - 600, payload)).unwrap();
        let err = adapter()
            .verify_signature(payload.as_bytes(), &header)
            .unwrap_err();
        assert!(err.message.contains("too old"));
    }

    #[test]
    fn verify_signature_future_timestamp() {
        let payload = r#"{"id":"evt_test"}"#;
        let header =
            SignatureHeader::parse(&sign_test_payload(SECRET, now() + 120, payload)).unwrap();
        let err = adapter()
            .verify_signature(payload.as_bytes(), &header)
            .unwrap_err();
        assert!(err.message.contains("future"));
    }

    #[test]
    fn verify_signature_small_future_tolerance() {
        let payload = r#"{"id":"evt_test"}"#;
        let header =
            SignatureHeader::parse(&sign_test_payload(SECRET, now() + 30, payload)).unwrap();
        assert!(adapter().verify_signature(payload.as_bytes(), &header).is_ok());
    }

    #[test]
    fn parse_payment_failed_event() {
        let payload = br#"{
            "id": "evt_1",
            "type": "payment_intent.payment_failed",
            "created": 1704067200,
            "data": {"object": {
                "id": "pi_1", "amount": 4500, "currency": "usd",
                "status": "requires_payment_method",
                "last_payment_error": {"message": "Your card was declined."}
            }},
            "livemode": false
        }"#;
        let event = adapter().parse_event(payload).unwrap();
        assert_eq!(event.event_type, WebhookEventType::PaymentIntentFailed);
        match event.data {
            WebhookEventData::PaymentIntent {
                intent_id,
                failure_message,
                ..
            } => {
                assert_eq!(intent_id, "pi_1");
                assert_eq!(failure_message.as_deref(), Some("Your card was declined."));
            }
            other => panic!("unexpected data {:?}", other),
        }
    }

    #[test]
    fn parse_charge_refunded_event() {
        let payload = br#"{
            "id": "evt_2",
            "type": "charge.refunded",
            "created": 1704067200,
            "data": {"object": {
                "id": "ch_1", "payment_intent": "pi_1", "amount": 4500,
                "amount_refunded": 1500, "refunded": false
            }},
            "livemode": false
        }"#;
        let event = adapter().parse_event(payload).unwrap();
        assert_eq!(event.event_type, WebhookEventType::ChargeRefunded);
        assert!(matches!(
            event.data,
            WebhookEventData::Charge {
                amount_refunded_cents: 1500,
                ..
            }
        ));
    }

    #[test]
    fn parse_unknown_event_type() {
        let payload = br#"{
            "id": "evt_3", "type": "customer.created", "created": 1704067200,
            "data": {"object": {"id": "cus_1"}}, "livemode": false
        }"#;
        let event = adapter().parse_event(payload).unwrap();
        assert_eq!(
            event.event_type,
            WebhookEventType::Unknown("customer.created".into())
        );
        assert!(matches!(event.data, WebhookEventData::Raw { .. }));
    }

    #[test]
    fn parse_rejects_test_mode_in_production() {
        let adapter = StripePaymentAdapter::new(
            StripeConfig::new("k", SECRET).with_require_livemode(true),
        );
        let payload = br#"{"id":"evt_4","type":"customer.created","created":1,"data":{"object":{}},"livemode":false}"#;
        assert!(adapter.parse_event(payload).is_err());
    }

    #[test]
    fn card_errors_keep_decline_code() {
        let body: StripeErrorBody = serde_json::from_str(
            r#"{"error":{"type":"card_error","code":"card_declined","decline_code":"insufficient_funds","message":"Insufficient funds"}}"#,
        )
        .unwrap();
        let err = map_stripe_error(StatusCode::PAYMENT_REQUIRED, Some(body), String::new());
        assert_eq!(err.code, PaymentErrorCode::InsufficientFunds);
        assert_eq!(err.provider_code.as_deref(), Some("insufficient_funds"));
        assert!(!err.retryable);
    }

    #[test]
    fn server_errors_are_retryable() {
        let err = map_stripe_error(StatusCode::BAD_GATEWAY, None, "upstream".into());
        assert!(err.retryable);
    }

    #[test]
    fn auth_errors_map_to_authentication() {
        let err = map_stripe_error(StatusCode::UNAUTHORIZED, None, "bad key".into());
        assert_eq!(err.code, PaymentErrorCode::AuthenticationError);
    }

    #[tokio::test]
    async fn verify_webhook_full_flow() {
        let payload = r#"{
            "id": "evt_ok",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "data": {"object": {"id": "pi_9", "amount": 2500, "currency": "usd", "status": "succeeded"}},
            "livemode": false
        }"#;
        let signature = sign_test_payload(SECRET, now(), payload);
        let event = adapter()
            .verify_webhook(payload.as_bytes(), &signature)
            .await
            .unwrap();
        assert_eq!(event.id, "evt_ok");
        assert_eq!(event.event_type, WebhookEventType::PaymentIntentSucceeded);
    }

    #[tokio::test]
    async fn verify_webhook_rejects_malformed_header() {
        let result = adapter()
            .verify_webhook(br#"{"id":"evt_test"}"#, "malformed_header")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn verify_webhook_rejects_invalid_json() {
        let payload = "not valid json";
        let signature = sign_test_payload(SECRET, now(), payload);
        let err = adapter()
            .verify_webhook(payload.as_bytes(), &signature)
            .await
            .unwrap_err();
        assert!(err.message.contains("Invalid JSON"));
    }
}
