//! In-memory adapters for every repository port.
//!
//! One `InMemoryStore` implements all of the persistence ports over shared
//! tables, so cross-table reads (analytics, organization membership) see the
//! same data the handlers wrote. Used by tests and local development.
//! Does not persist data across restarts.

mod community;
mod competition;
mod operations;
mod people;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::account::UserProfile;
use crate::domain::audit::AuditEntry;
use crate::domain::directory::DirectoryListing;
use crate::domain::email::QueuedEmail;
use crate::domain::event::Event;
use crate::domain::foundation::{
    EmailId, EventId, ListingId, OrganizationId, PaymentId, RegistrationId, ScoringSessionId,
    TeamId, TicketId, UserId,
};
use crate::domain::organization::{Organization, Team, TeamMember};
use crate::domain::payment::{Payment, Refund};
use crate::domain::registration::{CheckIn, Registration};
use crate::domain::scoring::{CompetitionResult, JudgeAssignment, JudgeScore, ScoringSession};
use crate::domain::support::SupportTicket;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    events: HashMap<EventId, Event>,
    registrations: HashMap<RegistrationId, Registration>,
    check_ins: HashMap<RegistrationId, CheckIn>,
    sessions: HashMap<ScoringSessionId, ScoringSession>,
    judges: Vec<JudgeAssignment>,
    scores: Vec<JudgeScore>,
    results: Vec<CompetitionResult>,
    profiles: HashMap<UserId, UserProfile>,
    payments: HashMap<PaymentId, Payment>,
    refunds: Vec<Refund>,
    emails: HashMap<EmailId, QueuedEmail>,
    organizations: HashMap<OrganizationId, Organization>,
    teams: HashMap<TeamId, Team>,
    members: Vec<TeamMember>,
    listings: HashMap<ListingId, DirectoryListing>,
    tickets: HashMap<TicketId, SupportTicket>,
    audit: Vec<AuditEntry>,
}

/// Shared in-memory tables behind every repository port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queued emails in insertion-independent order (by creation time).
    pub async fn queued_emails(&self) -> Vec<QueuedEmail> {
        let tables = self.tables.read().await;
        let mut emails: Vec<_> = tables.emails.values().cloned().collect();
        emails.sort_by_key(|e| e.created_at);
        emails
    }

    pub async fn audit_entries(&self) -> Vec<AuditEntry> {
        self.tables.read().await.audit.clone()
    }
}
