//! Support tickets.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    str_enum, DomainError, StateMachine, TicketId, Timestamp, UserId, ValidationError,
};
use crate::domain::registration::is_plausible_email;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

str_enum!(TicketPriority {
    Low => "low",
    Medium => "medium",
    High => "high",
    Urgent => "urgent",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

str_enum!(TicketStatus {
    Open => "open",
    InProgress => "in_progress",
    Resolved => "resolved",
    Closed => "closed",
});

impl StateMachine for TicketStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TicketStatus::*;
        matches!(
            (self, target),
            (Open, InProgress)
                | (Open, Closed)
                | (InProgress, Resolved)
                | (InProgress, Closed)
                | (Resolved, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TicketStatus::*;
        match self {
            Open => vec![InProgress, Closed],
            InProgress => vec![Resolved, Closed],
            Resolved => vec![Closed],
            Closed => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: TicketId,
    /// Set when the reporter was signed in.
    pub user_id: Option<UserId>,
    pub user_email: String,
    pub subject: String,
    pub description: String,
    pub priority: TicketPriority,
    pub category: Option<String>,
    /// Links to uploaded screenshots or documents.
    pub attachments: Vec<String>,
    pub status: TicketStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

impl SupportTicket {
    pub fn open(
        user_id: Option<UserId>,
        user_email: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
        priority: Option<TicketPriority>,
        category: Option<String>,
        attachments: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let user_email = user_email.into().trim().to_ascii_lowercase();
        if !is_plausible_email(&user_email) {
            return Err(ValidationError::invalid_format(
                "user_email",
                "not an email address",
            ));
        }
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(ValidationError::empty_field("subject"));
        }
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ValidationError::empty_field("description"));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: TicketId::new(),
            user_id,
            user_email,
            subject,
            description,
            priority: priority.unwrap_or_default(),
            category,
            attachments,
            status: TicketStatus::Open,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        })
    }

    pub fn is_reporter(&self, user_id: &UserId) -> bool {
        self.user_id.as_ref() == Some(user_id)
    }

    pub fn update_status(&mut self, status: TicketStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(status)?;
        let now = Timestamp::now();
        if status == TicketStatus::Resolved {
            self.resolved_at = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> SupportTicket {
        SupportTicket::open(
            None,
            "Fan@Example.com",
            "Can't pay",
            "Checkout spins forever",
            None,
            Some("payments".into()),
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn priority_defaults_to_medium() {
        let ticket = ticket();
        assert_eq!(ticket.priority, TicketPriority::Medium);
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.user_email, "fan@example.com");
    }

    #[test]
    fn resolving_stamps_resolved_at() {
        let mut ticket = ticket();
        ticket.update_status(TicketStatus::InProgress).unwrap();
        ticket.update_status(TicketStatus::Resolved).unwrap();
        assert!(ticket.resolved_at.is_some());
    }

    #[test]
    fn open_ticket_cannot_skip_to_resolved() {
        let mut ticket = ticket();
        assert!(ticket.update_status(TicketStatus::Resolved).is_err());
        ticket.update_status(TicketStatus::Closed).unwrap();
        assert!(ticket.status.is_terminal());
    }

    #[test]
    fn anonymous_ticket_has_no_reporter() {
        assert!(!ticket().is_reporter(&UserId::new("u").unwrap()));
    }
}
