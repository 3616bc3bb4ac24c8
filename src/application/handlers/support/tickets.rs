use std::sync::Arc;

use serde_json::json;

use crate::application::side_effects::record_audit;
use crate::application::Actor;
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::foundation::{DomainError, ErrorCode, TicketId};
use crate::domain::support::{SupportTicket, TicketPriority, TicketStatus};
use crate::ports::{AuditLog, SupportTicketRepository};

#[derive(Debug, Clone)]
pub struct CreateTicketCommand {
    /// `None` for anonymous reporters.
    pub actor: Option<Actor>,
    pub user_email: String,
    pub subject: String,
    pub description: String,
    pub priority: Option<TicketPriority>,
    pub category: Option<String>,
    pub attachments: Vec<String>,
}

pub struct CreateTicketHandler {
    tickets: Arc<dyn SupportTicketRepository>,
}

impl CreateTicketHandler {
    pub fn new(tickets: Arc<dyn SupportTicketRepository>) -> Self {
        Self { tickets }
    }

    pub async fn handle(&self, cmd: CreateTicketCommand) -> Result<SupportTicket, DomainError> {
        let ticket = SupportTicket::open(
            cmd.actor.map(|a| a.user_id),
            cmd.user_email,
            cmd.subject,
            cmd.description,
            cmd.priority,
            cmd.category,
            cmd.attachments,
        )?;
        self.tickets.save(&ticket).await?;
        tracing::info!(
            ticket_id = %ticket.id,
            priority = %ticket.priority,
            "Support ticket opened"
        );
        Ok(ticket)
    }
}

/// Admins see every ticket; everyone else sees the tickets they reported.
pub struct ListTicketsHandler {
    tickets: Arc<dyn SupportTicketRepository>,
}

impl ListTicketsHandler {
    pub fn new(tickets: Arc<dyn SupportTicketRepository>) -> Self {
        Self { tickets }
    }

    pub async fn handle(&self, actor: &Actor) -> Result<Vec<SupportTicket>, DomainError> {
        if actor.is_admin() {
            self.tickets.list(None).await
        } else {
            self.tickets.list(Some(&actor.user_id)).await
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateTicketStatusCommand {
    pub actor: Actor,
    pub ticket_id: TicketId,
    pub status: TicketStatus,
}

pub struct UpdateTicketStatusHandler {
    tickets: Arc<dyn SupportTicketRepository>,
    audit: Arc<dyn AuditLog>,
}

impl UpdateTicketStatusHandler {
    pub fn new(tickets: Arc<dyn SupportTicketRepository>, audit: Arc<dyn AuditLog>) -> Self {
        Self { tickets, audit }
    }

    pub async fn handle(&self, cmd: UpdateTicketStatusCommand) -> Result<SupportTicket, DomainError> {
        cmd.actor.ensure_admin()?;
        let mut ticket = self
            .tickets
            .find_by_id(&cmd.ticket_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::TicketNotFound,
                    format!("Ticket {} not found", cmd.ticket_id),
                )
            })?;

        let from = ticket.status;
        ticket.update_status(cmd.status)?;
        self.tickets.update(&ticket).await?;

        record_audit(
            self.audit.as_ref(),
            AuditEntry::record(
                cmd.actor.user_id,
                AuditAction::TicketStatusChanged,
                "support_ticket",
                ticket.id,
                json!({ "from": from.as_str(), "to": ticket.status.as_str() }),
            ),
        )
        .await;
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{admin, competitor};

    fn report(actor: Option<Actor>, email: &str) -> CreateTicketCommand {
        CreateTicketCommand {
            actor,
            user_email: email.to_string(),
            subject: "Payment stuck".to_string(),
            description: "Card was charged but entry still pending".to_string(),
            priority: None,
            category: Some("payments".to_string()),
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn reporters_see_only_their_own_tickets() {
        let store = InMemoryStore::new();
        let create = CreateTicketHandler::new(Arc::new(store.clone()));
        create
            .handle(report(Some(competitor("fan-1")), "fan1@example.com"))
            .await
            .unwrap();
        create
            .handle(report(Some(competitor("fan-2")), "fan2@example.com"))
            .await
            .unwrap();
        let anonymous = create.handle(report(None, "guest@example.com")).await.unwrap();
        assert_eq!(anonymous.priority, TicketPriority::Medium);

        let list = ListTicketsHandler::new(Arc::new(store));
        assert_eq!(list.handle(&competitor("fan-1")).await.unwrap().len(), 1);
        assert_eq!(list.handle(&admin()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let store = InMemoryStore::new();
        let err = CreateTicketHandler::new(Arc::new(store))
            .handle(report(None, "nope"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[tokio::test]
    async fn admin_moves_ticket_through_workflow() {
        let store = InMemoryStore::new();
        let ticket = CreateTicketHandler::new(Arc::new(store.clone()))
            .handle(report(None, "guest@example.com"))
            .await
            .unwrap();
        let handler = UpdateTicketStatusHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));
        let update = |actor, status| UpdateTicketStatusCommand {
            actor,
            ticket_id: ticket.id,
            status,
        };

        let err = handler
            .handle(update(competitor("fan-1"), TicketStatus::InProgress))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = handler
            .handle(update(admin(), TicketStatus::Resolved))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);

        handler
            .handle(update(admin(), TicketStatus::InProgress))
            .await
            .unwrap();
        let resolved = handler
            .handle(update(admin(), TicketStatus::Resolved))
            .await
            .unwrap();
        assert!(resolved.resolved_at.is_some());
        assert_eq!(store.audit_entries().await.len(), 2);
    }
}
