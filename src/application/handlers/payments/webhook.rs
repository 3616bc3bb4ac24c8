//! HandlePaymentWebhookHandler - Applies processor webhook events to payments.

use std::sync::Arc;

use crate::application::side_effects::queue_email;
use crate::domain::email::templates;
use crate::domain::foundation::{DomainError, PaymentId, RegistrationId};
use crate::domain::payment::Payment;
use crate::domain::registration::RegistrationStatus;
use crate::ports::{
    EmailQueue, PaymentProvider, PaymentRepository, RegistrationRepository, WebhookEvent,
    WebhookEventData, WebhookEventType,
};

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header.
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// Charge captured, registration confirmed.
    PaymentSucceeded {
        payment_id: PaymentId,
        registration_id: RegistrationId,
    },
    /// Attempt declined.
    PaymentFailed { payment_id: PaymentId },
    /// Refund total brought in line with the processor.
    RefundReconciled {
        payment_id: PaymentId,
        fully_refunded: bool,
    },
    /// Redelivery of an outcome already recorded.
    AlreadyApplied,
    /// Event acknowledged but not relevant to any known payment.
    Ignored,
}

/// Handler for processing payment provider webhooks.
///
/// Deliveries may repeat or arrive out of order. Every branch is idempotent:
/// an outcome that is already reflected in the payment row is acknowledged
/// without touching anything.
pub struct HandlePaymentWebhookHandler {
    payments: Arc<dyn PaymentRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    provider: Arc<dyn PaymentProvider>,
    emails: Arc<dyn EmailQueue>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        provider: Arc<dyn PaymentProvider>,
        emails: Arc<dyn EmailQueue>,
    ) -> Self {
        Self {
            payments,
            registrations,
            provider,
            emails,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, DomainError> {
        // 1. Verify webhook signature and parse event
        let event = self
            .provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await?;
        tracing::debug!(webhook_id = %event.id, event_type = ?event.event_type, "Webhook received");

        // 2. Process based on event type
        match &event.event_type {
            WebhookEventType::PaymentIntentSucceeded => self.handle_succeeded(&event).await,
            WebhookEventType::PaymentIntentFailed => self.handle_failed(&event).await,
            WebhookEventType::ChargeRefunded => self.handle_refunded(&event).await,
            WebhookEventType::Unknown(kind) => {
                tracing::debug!(event_type = %kind, "Ignoring unhandled webhook event");
                Ok(HandlePaymentWebhookResult::Ignored)
            }
        }
    }

    async fn handle_succeeded(
        &self,
        event: &WebhookEvent,
    ) -> Result<HandlePaymentWebhookResult, DomainError> {
        let WebhookEventData::PaymentIntent { intent_id, .. } = &event.data else {
            return Ok(mismatched(event));
        };
        let Some(mut payment) = self.find_payment(intent_id).await? else {
            return Ok(HandlePaymentWebhookResult::Ignored);
        };
        if !payment.mark_succeeded()? {
            return Ok(HandlePaymentWebhookResult::AlreadyApplied);
        }
        self.payments.update(&payment).await?;

        match self.registrations.find_by_id(&payment.registration_id).await? {
            Some(mut registration) if registration.status == RegistrationStatus::PendingPayment => {
                registration.confirm_payment()?;
                self.registrations.update(&registration).await?;
                queue_email(
                    self.emails.as_ref(),
                    templates::payment_received(&registration, &payment),
                )
                .await;
            }
            Some(registration) => {
                tracing::warn!(
                    payment_id = %payment.id,
                    registration_id = %registration.id,
                    status = %registration.status,
                    "Payment succeeded for a registration no longer awaiting payment"
                );
            }
            None => {
                tracing::warn!(
                    payment_id = %payment.id,
                    registration_id = %payment.registration_id,
                    "Payment succeeded for a missing registration"
                );
            }
        }

        tracing::info!(payment_id = %payment.id, "Payment succeeded");
        Ok(HandlePaymentWebhookResult::PaymentSucceeded {
            payment_id: payment.id,
            registration_id: payment.registration_id,
        })
    }

    async fn handle_failed(
        &self,
        event: &WebhookEvent,
    ) -> Result<HandlePaymentWebhookResult, DomainError> {
        let WebhookEventData::PaymentIntent {
            intent_id,
            failure_message,
            ..
        } = &event.data
        else {
            return Ok(mismatched(event));
        };
        let Some(mut payment) = self.find_payment(intent_id).await? else {
            return Ok(HandlePaymentWebhookResult::Ignored);
        };
        if !payment.mark_failed(failure_message.clone())? {
            return Ok(HandlePaymentWebhookResult::AlreadyApplied);
        }
        self.payments.update(&payment).await?;

        tracing::info!(
            payment_id = %payment.id,
            reason = failure_message.as_deref().unwrap_or("unknown"),
            "Payment attempt failed"
        );
        Ok(HandlePaymentWebhookResult::PaymentFailed {
            payment_id: payment.id,
        })
    }

    async fn handle_refunded(
        &self,
        event: &WebhookEvent,
    ) -> Result<HandlePaymentWebhookResult, DomainError> {
        let WebhookEventData::Charge {
            payment_intent_id: Some(intent_id),
            amount_refunded_cents,
            ..
        } = &event.data
        else {
            return Ok(mismatched(event));
        };
        let Some(mut payment) = self.find_payment(intent_id).await? else {
            return Ok(HandlePaymentWebhookResult::Ignored);
        };
        if !payment.reconcile_refunded_total(*amount_refunded_cents)? {
            return Ok(HandlePaymentWebhookResult::AlreadyApplied);
        }
        self.payments.update(&payment).await?;

        let fully_refunded = payment.is_fully_refunded();
        if fully_refunded {
            mark_registration_refunded(self.registrations.as_ref(), &payment).await?;
        }

        tracing::info!(
            payment_id = %payment.id,
            refunded_cents = payment.refunded_cents,
            "Refund reconciled from processor"
        );
        Ok(HandlePaymentWebhookResult::RefundReconciled {
            payment_id: payment.id,
            fully_refunded,
        })
    }

    async fn find_payment(&self, intent_id: &str) -> Result<Option<Payment>, DomainError> {
        let payment = self.payments.find_by_intent_id(intent_id).await?;
        if payment.is_none() {
            tracing::warn!(intent_id = %intent_id, "Webhook for unknown payment intent");
        }
        Ok(payment)
    }
}

/// Moves the registration behind a fully refunded payment to `refunded`.
///
/// Registrations that were never confirmed or are already closed out are
/// left alone.
pub(crate) async fn mark_registration_refunded(
    registrations: &dyn RegistrationRepository,
    payment: &Payment,
) -> Result<(), DomainError> {
    let Some(mut registration) = registrations.find_by_id(&payment.registration_id).await? else {
        return Ok(());
    };
    if matches!(
        registration.status,
        RegistrationStatus::Confirmed | RegistrationStatus::Approved
    ) {
        registration.mark_refunded()?;
        registrations.update(&registration).await?;
    }
    Ok(())
}

fn mismatched(event: &WebhookEvent) -> HandlePaymentWebhookResult {
    tracing::warn!(
        webhook_id = %event.id,
        event_type = ?event.event_type,
        "Webhook payload does not match its event type"
    );
    HandlePaymentWebhookResult::Ignored
}
