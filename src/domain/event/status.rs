//! Event lifecycle and competition format.

use crate::domain::foundation::{str_enum, StateMachine};
use serde::{Deserialize, Serialize};

/// Publication status of an event.
///
/// ```text
/// draft ──submit──▶ pending_approval ──approve──▶ published ──▶ completed
///   │                    │    └──reject──▶ draft        │
///   └──────cancel────────┴──────────────────────────────┴──▶ cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Editable by the organizer, invisible to the public.
    Draft,
    /// Waiting for an admin decision.
    PendingApproval,
    /// Listed publicly and open for registration.
    Published,
    Completed,
    Cancelled,
}

str_enum!(EventStatus {
    Draft => "draft",
    PendingApproval => "pending_approval",
    Published => "published",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl EventStatus {
    /// Whether unauthenticated callers may see the event.
    pub fn is_public(&self) -> bool {
        matches!(self, EventStatus::Published | EventStatus::Completed)
    }
}

impl StateMachine for EventStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use EventStatus::*;
        matches!(
            (self, target),
            (Draft, PendingApproval)
                | (Draft, Cancelled)
                | (PendingApproval, Published)
                | (PendingApproval, Draft)
                | (PendingApproval, Cancelled)
                | (Published, Completed)
                | (Published, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use EventStatus::*;
        match self {
            Draft => vec![PendingApproval, Cancelled],
            PendingApproval => vec![Published, Draft, Cancelled],
            Published => vec![Completed, Cancelled],
            Completed | Cancelled => vec![],
        }
    }
}

/// Competition format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Sound pressure level (loudness) competition.
    Spl,
    /// Sound quality competition.
    Sq,
    /// Show and shine.
    Show,
    Other,
}

str_enum!(EventType {
    Spl => "spl",
    Sq => "sq",
    Show => "show",
    Other => "other",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_can_be_submitted() {
        assert_eq!(
            EventStatus::Draft.transition_to(EventStatus::PendingApproval),
            Ok(EventStatus::PendingApproval)
        );
    }

    #[test]
    fn draft_cannot_skip_approval() {
        assert!(!EventStatus::Draft.can_transition_to(&EventStatus::Published));
    }

    #[test]
    fn rejection_returns_to_draft() {
        assert!(EventStatus::PendingApproval.can_transition_to(&EventStatus::Draft));
    }

    #[test]
    fn completed_and_cancelled_are_terminal() {
        assert!(EventStatus::Completed.is_terminal());
        assert!(EventStatus::Cancelled.is_terminal());
        assert!(!EventStatus::Published.is_terminal());
    }

    #[test]
    fn valid_transitions_agree_with_can_transition_to() {
        for from in EventStatus::ALL {
            for to in EventStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    from.valid_transitions().contains(to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn only_published_and_completed_are_public() {
        let public: Vec<_> = EventStatus::ALL.iter().filter(|s| s.is_public()).collect();
        assert_eq!(public, vec![&EventStatus::Published, &EventStatus::Completed]);
    }

    #[test]
    fn event_type_parses_lowercase_codes() {
        assert_eq!("spl".parse::<EventType>().unwrap(), EventType::Spl);
        assert!("SPL".parse::<EventType>().is_err());
    }
}
