//! Payment aggregate.
//!
//! A payment mirrors one processor payment intent for one registration. Webhook
//! deliveries may repeat or arrive out of order, so every settle operation reports
//! whether it changed anything and treats an already-applied outcome as a no-op.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, Money, PaymentId, RefundId, RegistrationId, StateMachine, Timestamp,
    UserId,
};

use super::PaymentStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub registration_id: RegistrationId,
    pub user_id: UserId,
    pub amount_cents: i64,
    pub currency: String,
    /// Processor payment intent id (`pi_...`).
    pub provider_intent_id: String,
    pub status: PaymentStatus,
    pub refunded_cents: i64,
    pub failure_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Payment {
    pub fn create(
        registration_id: RegistrationId,
        user_id: UserId,
        amount: Money,
        provider_intent_id: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: PaymentId::new(),
            registration_id,
            user_id,
            amount_cents: amount.cents(),
            currency: amount.currency().to_string(),
            provider_intent_id: provider_intent_id.into(),
            status: PaymentStatus::Pending,
            refunded_cents: 0,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Amount still available for refund.
    pub fn refundable_cents(&self) -> i64 {
        if self.status.is_refundable() {
            self.amount_cents - self.refunded_cents
        } else {
            0
        }
    }

    /// Collected amount net of refunds.
    pub fn net_cents(&self) -> i64 {
        if self.status.is_collected() {
            self.amount_cents - self.refunded_cents
        } else {
            0
        }
    }

    /// Records a successful charge. Returns `false` when already settled.
    pub fn mark_succeeded(&mut self) -> Result<bool, DomainError> {
        if self.status.is_collected() {
            return Ok(false);
        }
        self.transition(PaymentStatus::Succeeded)?;
        self.failure_reason = None;
        Ok(true)
    }

    /// Records a declined attempt. A failure reported after the charge
    /// succeeded is stale and ignored.
    pub fn mark_failed(&mut self, reason: Option<String>) -> Result<bool, DomainError> {
        match self.status {
            PaymentStatus::Pending => {
                self.transition(PaymentStatus::Failed)?;
                self.failure_reason = reason;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Applies a refund initiated through this service.
    pub fn apply_refund(&mut self, cents: i64) -> Result<(), DomainError> {
        if cents <= 0 {
            return Err(DomainError::validation(
                "amount_cents",
                "Refund amount must be positive",
            ));
        }
        if cents > self.refundable_cents() {
            return Err(DomainError::new(
                ErrorCode::RefundExceedsBalance,
                format!(
                    "Refund of {} exceeds refundable balance of {}",
                    cents,
                    self.refundable_cents()
                ),
            ));
        }
        self.set_refunded_total(self.refunded_cents + cents)
    }

    /// Reconciles with the processor's cumulative refunded amount.
    ///
    /// Returns `false` when the total is already reflected.
    pub fn reconcile_refunded_total(&mut self, total_refunded: i64) -> Result<bool, DomainError> {
        if total_refunded <= self.refunded_cents {
            return Ok(false);
        }
        if total_refunded > self.amount_cents {
            return Err(DomainError::new(
                ErrorCode::RefundExceedsBalance,
                format!(
                    "Processor reports {} refunded on a {} payment",
                    total_refunded, self.amount_cents
                ),
            ));
        }
        self.set_refunded_total(total_refunded)?;
        Ok(true)
    }

    pub fn is_fully_refunded(&self) -> bool {
        self.status == PaymentStatus::Refunded
    }

    fn set_refunded_total(&mut self, total: i64) -> Result<(), DomainError> {
        let target = if total >= self.amount_cents {
            PaymentStatus::Refunded
        } else {
            PaymentStatus::PartiallyRefunded
        };
        self.transition(target)?;
        self.refunded_cents = total;
        Ok(())
    }

    fn transition(&mut self, target: PaymentStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

/// One refund issued against a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub id: RefundId,
    pub payment_id: PaymentId,
    pub amount_cents: i64,
    /// Processor refund id (`re_...`).
    pub provider_refund_id: String,
    pub reason: Option<String>,
    pub requested_by: UserId,
    pub created_at: Timestamp,
}

impl Refund {
    pub fn record(
        payment: &Payment,
        amount_cents: i64,
        provider_refund_id: impl Into<String>,
        reason: Option<String>,
        requested_by: UserId,
    ) -> Self {
        Self {
            id: RefundId::new(),
            payment_id: payment.id,
            amount_cents,
            provider_refund_id: provider_refund_id.into(),
            reason,
            requested_by,
            created_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(amount: i64) -> Payment {
        Payment::create(
            RegistrationId::new(),
            UserId::new("competitor-1").unwrap(),
            Money::new(amount, "usd").unwrap(),
            "pi_123",
        )
    }

    fn paid(amount: i64) -> Payment {
        let mut payment = pending(amount);
        payment.mark_succeeded().unwrap();
        payment
    }

    #[test]
    fn duplicate_success_is_a_no_op() {
        let mut payment = pending(5_000);
        assert!(payment.mark_succeeded().unwrap());
        assert!(!payment.mark_succeeded().unwrap());
        assert_eq!(payment.status, PaymentStatus::Succeeded);
    }

    #[test]
    fn failure_after_success_is_ignored() {
        let mut payment = paid(5_000);
        assert!(!payment.mark_failed(Some("card_declined".into())).unwrap());
        assert_eq!(payment.status, PaymentStatus::Succeeded);
    }

    #[test]
    fn failed_intent_can_still_succeed() {
        let mut payment = pending(5_000);
        assert!(payment.mark_failed(Some("card_declined".into())).unwrap());
        assert!(payment.mark_succeeded().unwrap());
        assert!(payment.failure_reason.is_none());
    }

    #[test]
    fn partial_then_full_refund() {
        let mut payment = paid(5_000);
        payment.apply_refund(2_000).unwrap();
        assert_eq!(payment.status, PaymentStatus::PartiallyRefunded);
        assert_eq!(payment.refundable_cents(), 3_000);
        payment.apply_refund(3_000).unwrap();
        assert!(payment.is_fully_refunded());
        assert_eq!(payment.net_cents(), 0);
    }

    #[test]
    fn refund_cannot_exceed_balance() {
        let mut payment = paid(5_000);
        let err = payment.apply_refund(5_001).unwrap_err();
        assert_eq!(err.code, ErrorCode::RefundExceedsBalance);
    }

    #[test]
    fn unpaid_payment_has_nothing_to_refund() {
        let mut payment = pending(5_000);
        assert_eq!(payment.refundable_cents(), 0);
        assert!(payment.apply_refund(100).is_err());
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut payment = paid(5_000);
        assert!(payment.reconcile_refunded_total(1_500).unwrap());
        assert!(!payment.reconcile_refunded_total(1_500).unwrap());
        assert!(!payment.reconcile_refunded_total(1_000).unwrap());
        assert_eq!(payment.refunded_cents, 1_500);
        assert!(payment.reconcile_refunded_total(5_000).unwrap());
        assert!(payment.is_fully_refunded());
    }

    #[test]
    fn refund_record_points_at_payment() {
        let payment = paid(5_000);
        let refund = Refund::record(
            &payment,
            5_000,
            "re_1",
            None,
            UserId::new("admin").unwrap(),
        );
        assert_eq!(refund.payment_id, payment.id);
    }
}
