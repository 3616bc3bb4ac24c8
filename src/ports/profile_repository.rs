//! User profile persistence port.

use async_trait::async_trait;

use crate::domain::account::UserProfile;
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// # Errors
    ///
    /// - `Conflict` if a profile already exists for the user
    async fn save(&self, profile: &UserProfile) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `ProfileNotFound` if the profile doesn't exist
    async fn update(&self, profile: &UserProfile) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Business accounts awaiting an approval decision, oldest first.
    async fn list_pending_approval(&self) -> Result<Vec<UserProfile>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ProfileRepository) {}
    }
}
