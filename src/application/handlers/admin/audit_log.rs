use std::sync::Arc;

use crate::application::Actor;
use crate::domain::audit::AuditEntry;
use crate::domain::foundation::DomainError;
use crate::ports::AuditLog;

pub const DEFAULT_AUDIT_LIMIT: u32 = 50;
pub const MAX_AUDIT_LIMIT: u32 = 500;

/// Most recent audit entries first.
pub struct ListAuditLogHandler {
    audit: Arc<dyn AuditLog>,
}

impl ListAuditLogHandler {
    pub fn new(audit: Arc<dyn AuditLog>) -> Self {
        Self { audit }
    }

    pub async fn handle(
        &self,
        actor: &Actor,
        limit: Option<u32>,
    ) -> Result<Vec<AuditEntry>, DomainError> {
        actor.ensure_admin()?;
        let limit = limit
            .unwrap_or(DEFAULT_AUDIT_LIMIT)
            .clamp(1, MAX_AUDIT_LIMIT);
        self.audit.list_recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{admin, competitor, user};
    use crate::domain::audit::AuditAction;
    use crate::domain::foundation::ErrorCode;
    use serde_json::json;

    #[tokio::test]
    async fn lists_newest_first_within_limit() {
        let store = InMemoryStore::new();
        for action in [AuditAction::EventApproved, AuditAction::ListingRejected] {
            store
                .record(&AuditEntry::record(user("admin-1"), action, "event", "e-1", json!({})))
                .await
                .unwrap();
        }

        let handler = ListAuditLogHandler::new(Arc::new(store));
        let entries = handler.handle(&admin(), Some(1)).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::ListingRejected);

        let err = handler.handle(&competitor("fan-1"), None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
