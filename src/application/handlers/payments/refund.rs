//! RefundPaymentHandler - Issues a refund through the processor.

use std::sync::Arc;

use serde_json::json;

use super::webhook::mark_registration_refunded;
use crate::application::handlers::registrations::load_with_event;
use crate::application::side_effects::record_audit;
use crate::application::Actor;
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::foundation::{DomainError, ErrorCode, PaymentId};
use crate::domain::payment::{Payment, Refund};
use crate::ports::{
    AuditLog, CreateRefundRequest, EventRepository, PaymentProvider, PaymentRepository,
    RegistrationRepository,
};

#[derive(Debug, Clone)]
pub struct RefundPaymentCommand {
    pub actor: Actor,
    pub payment_id: PaymentId,
    /// Defaults to the full remaining balance.
    pub amount_cents: Option<i64>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RefundPaymentResult {
    pub payment: Payment,
    pub refund: Refund,
}

/// Handler for refunds requested by an admin or the event organizer.
///
/// The balance check runs before the processor call. The processor's own
/// `charge.refunded` webhook then reports a total that is already reflected
/// and is acknowledged as a no-op.
pub struct RefundPaymentHandler {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    payments: Arc<dyn PaymentRepository>,
    provider: Arc<dyn PaymentProvider>,
    audit: Arc<dyn AuditLog>,
}

impl RefundPaymentHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        payments: Arc<dyn PaymentRepository>,
        provider: Arc<dyn PaymentProvider>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            events,
            registrations,
            payments,
            provider,
            audit,
        }
    }

    pub async fn handle(&self, cmd: RefundPaymentCommand) -> Result<RefundPaymentResult, DomainError> {
        // 1. Load payment and check authority over its event
        let payment = self
            .payments
            .find_by_id(&cmd.payment_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::PaymentNotFound,
                    format!("Payment {} not found", cmd.payment_id),
                )
            })?;
        let (_, event) = load_with_event(
            self.events.as_ref(),
            self.registrations.as_ref(),
            &payment.registration_id,
        )
        .await?;
        cmd.actor.ensure_can_act_for(&event.organizer_id, "payment")?;

        // 2. Validate the amount against the balance
        let amount = cmd.amount_cents.unwrap_or_else(|| payment.refundable_cents());
        let mut updated = payment.clone();
        updated.apply_refund(amount)?;

        // 3. Refund through the processor
        let provider_refund = self
            .provider
            .create_refund(CreateRefundRequest {
                payment_intent_id: payment.provider_intent_id.clone(),
                amount_cents: amount,
                reason: cmd.reason.clone(),
                idempotency_key: Some(format!("refund-{}-{}", payment.id, payment.refunded_cents)),
            })
            .await?;

        // 4. Persist
        let refund = Refund::record(
            &updated,
            amount,
            provider_refund.id,
            cmd.reason,
            cmd.actor.user_id.clone(),
        );
        self.payments.update(&updated).await?;
        self.payments.save_refund(&refund).await?;
        if updated.is_fully_refunded() {
            mark_registration_refunded(self.registrations.as_ref(), &updated).await?;
        }

        // 5. Audit (non-critical)
        record_audit(
            self.audit.as_ref(),
            AuditEntry::record(
                cmd.actor.user_id,
                AuditAction::PaymentRefunded,
                "payment",
                updated.id,
                json!({
                    "amount_cents": amount,
                    "refunded_cents": updated.refunded_cents,
                    "reason": refund.reason,
                }),
            ),
        )
        .await;

        tracing::info!(
            payment_id = %updated.id,
            amount_cents = amount,
            status = %updated.status,
            "Payment refunded"
        );
        Ok(RefundPaymentResult {
            payment: updated,
            refund,
        })
    }
}
