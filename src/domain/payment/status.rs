//! Payment status state machine.

use crate::domain::foundation::{str_enum, StateMachine};
use serde::{Deserialize, Serialize};

/// Lifecycle of a payment intent as mirrored from the processor.
///
/// ```text
/// pending ──▶ succeeded ──▶ partially_refunded ──▶ refunded
///    │            ▲  └─────────────────────────────────▲
///    └──▶ failed ─┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Intent created, waiting for the competitor to pay.
    Pending,
    Succeeded,
    /// Last attempt was declined. The intent can still be paid with another method.
    Failed,
    PartiallyRefunded,
    Refunded,
}

str_enum!(PaymentStatus {
    Pending => "pending",
    Succeeded => "succeeded",
    Failed => "failed",
    PartiallyRefunded => "partially_refunded",
    Refunded => "refunded",
});

impl PaymentStatus {
    /// Whether money was collected and not fully returned.
    pub fn is_refundable(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Succeeded | PaymentStatus::PartiallyRefunded
        )
    }

    /// Whether the payment counts toward revenue.
    pub fn is_collected(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Succeeded | PaymentStatus::PartiallyRefunded | PaymentStatus::Refunded
        )
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            (Pending, Succeeded)
                | (Pending, Failed)
                | (Failed, Succeeded)
                | (Succeeded, Refunded)
                | (Succeeded, PartiallyRefunded)
                | (PartiallyRefunded, PartiallyRefunded)
                | (PartiallyRefunded, Refunded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Succeeded, Failed],
            Failed => vec![Succeeded],
            Succeeded => vec![Refunded, PartiallyRefunded],
            PartiallyRefunded => vec![PartiallyRefunded, Refunded],
            Refunded => vec![],
        }
    }
}
