//! Payment and refund persistence port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PaymentId, RegistrationId};
use crate::domain::payment::{Payment, Refund};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `PaymentNotFound` if the payment doesn't exist
    async fn update(&self, payment: &Payment) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError>;

    async fn find_by_intent_id(&self, intent_id: &str) -> Result<Option<Payment>, DomainError>;

    /// Payments for a registration, newest first.
    async fn list_for_registration(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Vec<Payment>, DomainError>;

    async fn save_refund(&self, refund: &Refund) -> Result<(), DomainError>;

    async fn list_refunds(&self, payment_id: &PaymentId) -> Result<Vec<Refund>, DomainError>;
}
