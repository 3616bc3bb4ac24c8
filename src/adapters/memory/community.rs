//! Organizations, directory listings and support tickets over the shared tables.

use async_trait::async_trait;

use crate::domain::directory::DirectoryListing;
use crate::domain::foundation::{
    DomainError, ErrorCode, ListingId, OrganizationId, TeamId, TicketId, UserId,
};
use crate::domain::organization::{Organization, Team, TeamMember};
use crate::domain::support::SupportTicket;
use crate::ports::{
    DirectoryRepository, ListingFilter, OrganizationRepository, SupportTicketRepository,
};

use super::InMemoryStore;

#[async_trait]
impl OrganizationRepository for InMemoryStore {
    async fn save_organization(&self, organization: &Organization) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables
            .organizations
            .values()
            .any(|o| o.slug == organization.slug)
        {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Organization slug '{}' is taken", organization.slug),
            ));
        }
        tables
            .organizations
            .insert(organization.id, organization.clone());
        Ok(())
    }

    async fn find_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, DomainError> {
        Ok(self.tables.read().await.organizations.get(id).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Organization>, DomainError> {
        let tables = self.tables.read().await;
        let member_of: Vec<OrganizationId> = tables
            .members
            .iter()
            .filter(|m| &m.user_id == user_id)
            .filter_map(|m| tables.teams.get(&m.team_id).map(|t| t.organization_id))
            .collect();
        let mut organizations: Vec<Organization> = tables
            .organizations
            .values()
            .filter(|o| &o.owner_id == user_id || member_of.contains(&o.id))
            .cloned()
            .collect();
        organizations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(organizations)
    }

    async fn save_team(&self, team: &Team) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables
            .teams
            .values()
            .any(|t| t.organization_id == team.organization_id && t.name == team.name)
        {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Team '{}' already exists", team.name),
            ));
        }
        tables.teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn find_team(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        Ok(self.tables.read().await.teams.get(id).cloned())
    }

    async fn list_teams(&self, organization_id: &OrganizationId) -> Result<Vec<Team>, DomainError> {
        let tables = self.tables.read().await;
        let mut teams: Vec<Team> = tables
            .teams
            .values()
            .filter(|t| &t.organization_id == organization_id)
            .cloned()
            .collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    async fn add_member(&self, member: &TeamMember) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables
            .members
            .iter()
            .any(|m| m.team_id == member.team_id && m.user_id == member.user_id)
        {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "User is already on the team",
            ));
        }
        tables.members.push(member.clone());
        Ok(())
    }

    async fn remove_member(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let before = tables.members.len();
        tables
            .members
            .retain(|m| !(&m.team_id == team_id && &m.user_id == user_id));
        Ok(tables.members.len() < before)
    }

    async fn list_members(&self, team_id: &TeamId) -> Result<Vec<TeamMember>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .iter()
            .filter(|m| &m.team_id == team_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryStore {
    async fn save(&self, listing: &DirectoryListing) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .listings
            .insert(listing.id, listing.clone());
        Ok(())
    }

    async fn update(&self, listing: &DirectoryListing) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.listings.get_mut(&listing.id) {
            Some(stored) => {
                *stored = listing.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::ListingNotFound,
                format!("Listing not found: {}", listing.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<DirectoryListing>, DomainError> {
        Ok(self.tables.read().await.listings.get(id).cloned())
    }

    async fn list(&self, filter: &ListingFilter) -> Result<Vec<DirectoryListing>, DomainError> {
        let tables = self.tables.read().await;
        let mut listings: Vec<DirectoryListing> = tables
            .listings
            .values()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        listings.sort_by(|a, b| a.details.business_name.cmp(&b.details.business_name));
        Ok(listings)
    }
}

#[async_trait]
impl SupportTicketRepository for InMemoryStore {
    async fn save(&self, ticket: &SupportTicket) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .tickets
            .insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn update(&self, ticket: &SupportTicket) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.tickets.get_mut(&ticket.id) {
            Some(stored) => {
                *stored = ticket.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::TicketNotFound,
                format!("Support ticket not found: {}", ticket.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<SupportTicket>, DomainError> {
        Ok(self.tables.read().await.tickets.get(id).cloned())
    }

    async fn list(&self, reporter: Option<&UserId>) -> Result<Vec<SupportTicket>, DomainError> {
        let tables = self.tables.read().await;
        let mut tickets: Vec<SupportTicket> = tables
            .tickets
            .values()
            .filter(|t| reporter.map_or(true, |r| t.user_id.as_ref() == Some(r)))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::organization::TeamRole;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn team_membership_makes_organization_visible() {
        let store = InMemoryStore::new();
        let org = Organization::create(user("owner-1"), "Bass Heads", None, None, None).unwrap();
        store.save_organization(&org).await.unwrap();
        let team = Team::create(&org, "Street Team").unwrap();
        store.save_team(&team).await.unwrap();
        store
            .add_member(&TeamMember::new(team.id, user("racer-1"), TeamRole::Member))
            .await
            .unwrap();

        let visible = store.list_for_user(&user("racer-1")).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert!(store.list_for_user(&user("stranger")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn taken_slug_is_a_conflict() {
        let store = InMemoryStore::new();
        let org = Organization::create(user("owner-1"), "Bass Heads", None, None, None).unwrap();
        store.save_organization(&org).await.unwrap();
        let copy = Organization::create(user("owner-2"), "Bass Heads", None, None, None).unwrap();

        let err = store.save_organization(&copy).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn removing_absent_member_reports_false() {
        let store = InMemoryStore::new();
        assert!(!store
            .remove_member(&TeamId::new(), &user("nobody"))
            .await
            .unwrap());
    }
}
