//! Admin audit trail port.

use async_trait::async_trait;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::DomainError;

#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, entry: &AuditEntry) -> Result<(), DomainError>;

    /// Most recent first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DomainError>;
}
