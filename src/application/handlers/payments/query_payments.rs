use std::sync::Arc;

use crate::application::handlers::registrations::load_with_event;
use crate::application::Actor;
use crate::domain::foundation::{DomainError, RegistrationId};
use crate::domain::payment::Payment;
use crate::ports::{EventRepository, PaymentRepository, RegistrationRepository};

#[derive(Debug, Clone)]
pub struct ListPaymentsQuery {
    pub actor: Actor,
    pub registration_id: RegistrationId,
}

/// Payment attempts for a registration, visible to the registrant, the
/// event organizer and admins.
pub struct ListPaymentsHandler {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl ListPaymentsHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        payments: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self {
            events,
            registrations,
            payments,
        }
    }

    pub async fn handle(&self, query: ListPaymentsQuery) -> Result<Vec<Payment>, DomainError> {
        let (registration, event) = load_with_event(
            self.events.as_ref(),
            self.registrations.as_ref(),
            &query.registration_id,
        )
        .await?;
        if !registration.is_owner(&query.actor.user_id) {
            query
                .actor
                .ensure_can_act_for(&event.organizer_id, "registration")?;
        }
        self.payments.list_for_registration(&registration.id).await
    }
}
