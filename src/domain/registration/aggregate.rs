//! Registration aggregate and check-in record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::event::Event;
use crate::domain::foundation::{
    CheckInId, DomainError, EventId, RegistrationId, StateMachine, Timestamp, UserId,
    ValidationError,
};

use super::RegistrationStatus;

/// Competitor-supplied registration form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorEntry {
    pub competitor_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Free-form vehicle description (make, model, year, system details).
    pub vehicle_info: Value,
    /// Competition class the competitor enters, e.g. `street-1` or `sq-expert`.
    pub category: String,
    pub team_name: Option<String>,
}

impl CompetitorEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.competitor_name.trim().is_empty() {
            return Err(ValidationError::empty_field("competitor_name"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !is_plausible_email(email) {
            return Err(ValidationError::invalid_format("email", "not an email address"));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::empty_field("category"));
        }
        if !(self.vehicle_info.is_object() || self.vehicle_info.is_null()) {
            return Err(ValidationError::invalid_format(
                "vehicle_info",
                "must be a JSON object",
            ));
        }
        Ok(())
    }
}

/// Minimal address check: one `@` with text on both sides and a dot in the domain.
pub fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.contains('@') && domain.contains('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

/// A competitor's entry into one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub entry: CompetitorEntry,
    /// Fee locked in at registration time.
    pub amount_due_cents: i64,
    pub status: RegistrationStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Registration {
    /// Creates a registration priced for `event` on the current date.
    ///
    /// Free entries skip payment and start confirmed.
    pub fn create(
        event: &Event,
        user_id: UserId,
        mut entry: CompetitorEntry,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        entry.validate()?;
        entry.email = entry.email.trim().to_ascii_lowercase();
        entry.category = entry.category.trim().to_string();
        if entry.vehicle_info.is_null() {
            entry.vehicle_info = Value::Object(Default::default());
        }
        let amount_due_cents = event.price_on(now.date());
        let status = if amount_due_cents == 0 {
            RegistrationStatus::Confirmed
        } else {
            RegistrationStatus::PendingPayment
        };
        Ok(Self {
            id: RegistrationId::new(),
            event_id: event.id,
            user_id,
            entry,
            amount_due_cents,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    pub fn confirm_payment(&mut self) -> Result<(), DomainError> {
        self.transition(RegistrationStatus::Confirmed)
    }

    pub fn approve(&mut self) -> Result<(), DomainError> {
        self.transition(RegistrationStatus::Approved)
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition(RegistrationStatus::Cancelled)
    }

    pub fn mark_refunded(&mut self) -> Result<(), DomainError> {
        self.transition(RegistrationStatus::Refunded)
    }

    fn transition(&mut self, target: RegistrationStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

/// Arrival of a registered competitor at the venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: CheckInId,
    pub event_id: EventId,
    pub registration_id: RegistrationId,
    pub checked_in_by: UserId,
    pub checked_in_at: Timestamp,
}

impl CheckIn {
    pub fn record(registration: &Registration, checked_in_by: UserId) -> Self {
        Self {
            id: CheckInId::new(),
            event_id: registration.event_id,
            registration_id: registration.id,
            checked_in_by,
            checked_in_at: Timestamp::now(),
        }
    }
}
