//! Profiles and payments over the shared tables.

use async_trait::async_trait;

use crate::domain::account::{ApprovalStatus, UserProfile};
use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, RegistrationId, UserId};
use crate::domain::payment::{Payment, Refund};
use crate::ports::{PaymentRepository, ProfileRepository};

use super::InMemoryStore;

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn save(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables.profiles.contains_key(&profile.id) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Profile already exists: {}", profile.id),
            ));
        }
        tables.profiles.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn update(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.profiles.get_mut(&profile.id) {
            Some(stored) => {
                *stored = profile.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::ProfileNotFound,
                format!("Profile not found: {}", profile.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.tables.read().await.profiles.get(id).cloned())
    }

    async fn list_pending_approval(&self) -> Result<Vec<UserProfile>, DomainError> {
        let tables = self.tables.read().await;
        let mut pending: Vec<UserProfile> = tables
            .profiles
            .values()
            .filter(|p| p.approval_status == ApprovalStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|p| p.created_at);
        Ok(pending)
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .payments
            .values()
            .any(|p| p.provider_intent_id == payment.provider_intent_id);
        if duplicate {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Payment intent is already recorded",
            ));
        }
        tables.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.payments.get_mut(&payment.id) {
            Some(stored) => {
                *stored = payment.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                format!("Payment not found: {}", payment.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(self.tables.read().await.payments.get(id).cloned())
    }

    async fn find_by_intent_id(&self, intent_id: &str) -> Result<Option<Payment>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .values()
            .find(|p| p.provider_intent_id == intent_id)
            .cloned())
    }

    async fn list_for_registration(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Vec<Payment>, DomainError> {
        let tables = self.tables.read().await;
        let mut payments: Vec<Payment> = tables
            .payments
            .values()
            .filter(|p| &p.registration_id == registration_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }

    async fn save_refund(&self, refund: &Refund) -> Result<(), DomainError> {
        self.tables.write().await.refunds.push(refund.clone());
        Ok(())
    }

    async fn list_refunds(&self, payment_id: &PaymentId) -> Result<Vec<Refund>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .refunds
            .iter()
            .filter(|r| &r.payment_id == payment_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{profile, AccountType};

    #[tokio::test]
    async fn duplicate_profile_is_a_conflict() {
        let store = InMemoryStore::new();
        let competitor = profile("racer-1", AccountType::Competitor);
        ProfileRepository::save(&store, &competitor).await.unwrap();

        let err = ProfileRepository::save(&store, &competitor)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn pending_approvals_exclude_decided_accounts() {
        let store = InMemoryStore::new();
        let mut shop = profile("shop-1", AccountType::Retailer);
        shop.approval_status = ApprovalStatus::Pending;
        ProfileRepository::save(&store, &shop).await.unwrap();
        ProfileRepository::save(&store, &profile("shop-2", AccountType::Retailer))
            .await
            .unwrap();

        let pending = store.list_pending_approval().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, shop.id);
    }
}
