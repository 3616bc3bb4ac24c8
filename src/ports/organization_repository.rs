//! Organizations, teams and rosters.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrganizationId, TeamId, UserId};
use crate::domain::organization::{Organization, Team, TeamMember};

#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// # Errors
    ///
    /// - `Conflict` if the slug is taken
    async fn save_organization(&self, organization: &Organization) -> Result<(), DomainError>;

    async fn find_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, DomainError>;

    /// Organizations the user owns or belongs to through a team.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Organization>, DomainError>;

    /// # Errors
    ///
    /// - `Conflict` if the organization already has a team with that name
    async fn save_team(&self, team: &Team) -> Result<(), DomainError>;

    async fn find_team(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    async fn list_teams(&self, organization_id: &OrganizationId) -> Result<Vec<Team>, DomainError>;

    /// # Errors
    ///
    /// - `Conflict` if the user is already on the team
    async fn add_member(&self, member: &TeamMember) -> Result<(), DomainError>;

    /// Returns `false` when the user was not on the team.
    async fn remove_member(&self, team_id: &TeamId, user_id: &UserId)
        -> Result<bool, DomainError>;

    async fn list_members(&self, team_id: &TeamId) -> Result<Vec<TeamMember>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn OrganizationRepository) {}
    }
}
