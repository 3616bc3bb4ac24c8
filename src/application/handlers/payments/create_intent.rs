//! CreatePaymentIntentHandler - Starts card payment of an entry fee.

use std::sync::Arc;

use crate::application::handlers::registrations::load_with_event;
use crate::application::Actor;
use crate::domain::foundation::{DomainError, ErrorCode, Money, RegistrationId};
use crate::domain::payment::Payment;
use crate::domain::registration::RegistrationStatus;
use crate::ports::{
    CreatePaymentIntentRequest, EventRepository, PaymentProvider, PaymentRepository,
    ProfileRepository, RegistrationRepository,
};

#[derive(Debug, Clone)]
pub struct CreatePaymentIntentCommand {
    pub actor: Actor,
    pub registration_id: RegistrationId,
}

#[derive(Debug, Clone)]
pub struct CreatePaymentIntentResult {
    pub payment: Payment,
    /// Handed to the browser to confirm the card payment.
    pub client_secret: String,
}

/// Handler for creating a payment intent.
///
/// Only the registrant may pay, and only while the registration awaits
/// payment. Each attempt gets its own intent and pending payment row; the
/// webhook settles whichever one the competitor completes.
pub struct CreatePaymentIntentHandler {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    payments: Arc<dyn PaymentRepository>,
    profiles: Arc<dyn ProfileRepository>,
    provider: Arc<dyn PaymentProvider>,
    currency: String,
}

impl CreatePaymentIntentHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        payments: Arc<dyn PaymentRepository>,
        profiles: Arc<dyn ProfileRepository>,
        provider: Arc<dyn PaymentProvider>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            events,
            registrations,
            payments,
            profiles,
            provider,
            currency: currency.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<CreatePaymentIntentResult, DomainError> {
        // 1. Load registration and check the caller owns it
        let (registration, event) = load_with_event(
            self.events.as_ref(),
            self.registrations.as_ref(),
            &cmd.registration_id,
        )
        .await?;
        if !registration.is_owner(&cmd.actor.user_id) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Only the registrant can pay for a registration",
            ));
        }
        if registration.status != RegistrationStatus::PendingPayment {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Registration is {}, not awaiting payment", registration.status),
            ));
        }

        // 2. Build the provider request
        let amount = Money::new(registration.amount_due_cents, self.currency.as_str())?;
        let attempt = self
            .payments
            .list_for_registration(&registration.id)
            .await?
            .len();
        let customer_id = self
            .profiles
            .find_by_id(&registration.user_id)
            .await?
            .and_then(|p| p.payment_customer_id);

        let intent = self
            .provider
            .create_payment_intent(CreatePaymentIntentRequest {
                amount: amount.clone(),
                customer_id,
                receipt_email: Some(registration.entry.email.clone()),
                description: format!(
                    "{} entry: {}",
                    event.details.name, registration.entry.category
                ),
                registration_id: registration.id.to_string(),
                idempotency_key: Some(format!("registration-{}-{}", registration.id, attempt)),
            })
            .await?;

        // 3. Track the pending payment
        let payment = Payment::create(registration.id, registration.user_id, amount, intent.id);
        self.payments.save(&payment).await?;

        tracing::info!(
            registration_id = %registration.id,
            payment_id = %payment.id,
            amount_cents = payment.amount_cents,
            "Payment intent created"
        );
        Ok(CreatePaymentIntentResult {
            payment,
            client_secret: intent.client_secret,
        })
    }
}
