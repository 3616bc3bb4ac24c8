//! Registration and check-in persistence port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventId, RegistrationId, UserId};
use crate::domain::registration::{CheckIn, Registration, RegistrationStatus};

/// Listing filters. Results are ordered by registration time, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFilter {
    pub event_id: Option<EventId>,
    pub user_id: Option<UserId>,
    pub status: Option<RegistrationStatus>,
}

impl RegistrationFilter {
    pub fn matches(&self, registration: &Registration) -> bool {
        self.event_id.map_or(true, |e| registration.event_id == e)
            && self
                .user_id
                .as_ref()
                .map_or(true, |u| &registration.user_id == u)
            && self.status.map_or(true, |s| registration.status == s)
    }
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Saves a new registration.
    ///
    /// # Errors
    ///
    /// - `AlreadyRegistered` if the user holds another active registration for the event
    async fn save(&self, registration: &Registration) -> Result<(), DomainError>;

    async fn update(&self, registration: &Registration) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &RegistrationId) -> Result<Option<Registration>, DomainError>;

    async fn find_active(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> Result<Option<Registration>, DomainError>;

    async fn list(&self, filter: &RegistrationFilter) -> Result<Vec<Registration>, DomainError>;

    /// Registrations that still hold a spot (not cancelled or refunded).
    async fn count_active(&self, event_id: &EventId) -> Result<u32, DomainError>;

    /// # Errors
    ///
    /// - `AlreadyCheckedIn` if the registration was already checked in
    async fn record_check_in(&self, check_in: &CheckIn) -> Result<(), DomainError>;

    async fn find_check_in(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Option<CheckIn>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn RegistrationRepository) {}
    }
}
