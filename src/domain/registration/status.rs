//! Registration lifecycle.

use crate::domain::foundation::{str_enum, StateMachine};
use serde::{Deserialize, Serialize};

/// Status of a competitor's registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Entry fee not yet paid.
    PendingPayment,
    /// Paid (or free) and awaiting organizer approval.
    Confirmed,
    /// Accepted into the competition; eligible for judging.
    Approved,
    Cancelled,
    Refunded,
}

str_enum!(RegistrationStatus {
    PendingPayment => "pending_payment",
    Confirmed => "confirmed",
    Approved => "approved",
    Cancelled => "cancelled",
    Refunded => "refunded",
});

impl RegistrationStatus {
    /// Whether the registration occupies a competitor slot.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            RegistrationStatus::PendingPayment
                | RegistrationStatus::Confirmed
                | RegistrationStatus::Approved
        )
    }

    pub fn can_check_in(&self) -> bool {
        matches!(
            self,
            RegistrationStatus::Confirmed | RegistrationStatus::Approved
        )
    }
}

impl StateMachine for RegistrationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use RegistrationStatus::*;
        matches!(
            (self, target),
            (PendingPayment, Confirmed)
                | (PendingPayment, Cancelled)
                | (Confirmed, Approved)
                | (Confirmed, Cancelled)
                | (Confirmed, Refunded)
                | (Approved, Cancelled)
                | (Approved, Refunded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RegistrationStatus::*;
        match self {
            PendingPayment => vec![Confirmed, Cancelled],
            Confirmed => vec![Approved, Cancelled, Refunded],
            Approved => vec![Cancelled, Refunded],
            Cancelled | Refunded => vec![],
        }
    }
}
