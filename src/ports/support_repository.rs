//! Support ticket persistence port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TicketId, UserId};
use crate::domain::support::SupportTicket;

#[async_trait]
pub trait SupportTicketRepository: Send + Sync {
    async fn save(&self, ticket: &SupportTicket) -> Result<(), DomainError>;

    async fn update(&self, ticket: &SupportTicket) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<SupportTicket>, DomainError>;

    /// Newest first. `None` lists every ticket.
    async fn list(&self, reporter: Option<&UserId>) -> Result<Vec<SupportTicket>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_ticket_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SupportTicketRepository) {}
    }
}
