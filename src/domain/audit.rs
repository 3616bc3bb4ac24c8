//! Admin audit trail.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{str_enum, AuditEntryId, Timestamp, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    EventApproved,
    EventRejected,
    EventCancelled,
    EventCompleted,
    AccountApproved,
    AccountRejected,
    AccountDeactivated,
    ListingApproved,
    ListingRejected,
    PaymentRefunded,
    ScoringSessionClosed,
    TicketStatusChanged,
}

str_enum!(AuditAction {
    EventApproved => "event_approved",
    EventRejected => "event_rejected",
    EventCancelled => "event_cancelled",
    EventCompleted => "event_completed",
    AccountApproved => "account_approved",
    AccountRejected => "account_rejected",
    AccountDeactivated => "account_deactivated",
    ListingApproved => "listing_approved",
    ListingRejected => "listing_rejected",
    PaymentRefunded => "payment_refunded",
    ScoringSessionClosed => "scoring_session_closed",
    TicketStatusChanged => "ticket_status_changed",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub actor_id: UserId,
    pub action: AuditAction,
    /// Table-style name of the affected entity, e.g. `event`.
    pub entity_type: String,
    pub entity_id: String,
    pub details: Value,
    pub created_at: Timestamp,
}

impl AuditEntry {
    pub fn record(
        actor_id: UserId,
        action: AuditAction,
        entity_type: &str,
        entity_id: impl ToString,
        details: Value,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            actor_id,
            action,
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            details,
            created_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::EventId;
    use serde_json::json;

    #[test]
    fn entity_id_is_stringified() {
        let id = EventId::new();
        let entry = AuditEntry::record(
            UserId::new("admin").unwrap(),
            AuditAction::EventApproved,
            "event",
            id,
            json!({}),
        );
        assert_eq!(entry.entity_id, id.to_string());
        assert_eq!(entry.action.as_str(), "event_approved");
    }
}
