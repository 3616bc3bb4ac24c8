//! Teams and rosters.

use std::sync::Arc;

use super::manage_organization::load_organization;
use crate::application::Actor;
use crate::domain::foundation::{DomainError, ErrorCode, OrganizationId, TeamId, UserId};
use crate::domain::organization::{can_manage_roster, Organization, Team, TeamMember, TeamRole};
use crate::ports::OrganizationRepository;

async fn load_team_with_org(
    organizations: &dyn OrganizationRepository,
    team_id: &TeamId,
) -> Result<(Team, Organization), DomainError> {
    let team = organizations
        .find_team(team_id)
        .await?
        .ok_or_else(|| {
            DomainError::new(ErrorCode::TeamNotFound, format!("Team {} not found", team_id))
        })?;
    let organization = load_organization(organizations, &team.organization_id).await?;
    Ok((team, organization))
}

/// Owner, captain, or admin.
async fn ensure_roster_manager(
    organizations: &dyn OrganizationRepository,
    team: &Team,
    organization: &Organization,
    actor: &Actor,
) -> Result<(), DomainError> {
    if actor.is_admin() {
        return Ok(());
    }
    let roster = organizations.list_members(&team.id).await?;
    can_manage_roster(organization, &roster, &actor.user_id)
}

#[derive(Debug, Clone)]
pub struct CreateTeamCommand {
    pub actor: Actor,
    pub organization_id: OrganizationId,
    pub name: String,
}

/// Only the organization owner (or an admin) creates teams. Names are unique
/// within an organization.
pub struct CreateTeamHandler {
    organizations: Arc<dyn OrganizationRepository>,
}

impl CreateTeamHandler {
    pub fn new(organizations: Arc<dyn OrganizationRepository>) -> Self {
        Self { organizations }
    }

    pub async fn handle(&self, cmd: CreateTeamCommand) -> Result<Team, DomainError> {
        let organization =
            load_organization(self.organizations.as_ref(), &cmd.organization_id).await?;
        cmd.actor
            .ensure_can_act_for(&organization.owner_id, "organization")?;

        let team = Team::create(&organization, cmd.name)?;
        self.organizations.save_team(&team).await?;
        Ok(team)
    }
}

#[derive(Debug, Clone)]
pub struct AddTeamMemberCommand {
    pub actor: Actor,
    pub team_id: TeamId,
    pub user_id: UserId,
    pub role: TeamRole,
}

pub struct AddTeamMemberHandler {
    organizations: Arc<dyn OrganizationRepository>,
}

impl AddTeamMemberHandler {
    pub fn new(organizations: Arc<dyn OrganizationRepository>) -> Self {
        Self { organizations }
    }

    pub async fn handle(&self, cmd: AddTeamMemberCommand) -> Result<TeamMember, DomainError> {
        let (team, organization) =
            load_team_with_org(self.organizations.as_ref(), &cmd.team_id).await?;
        ensure_roster_manager(self.organizations.as_ref(), &team, &organization, &cmd.actor)
            .await?;

        let member = TeamMember::new(team.id, cmd.user_id, cmd.role);
        self.organizations.add_member(&member).await?;
        Ok(member)
    }
}

#[derive(Debug, Clone)]
pub struct RemoveTeamMemberCommand {
    pub actor: Actor,
    pub team_id: TeamId,
    pub user_id: UserId,
}

/// Members may always leave a team themselves.
pub struct RemoveTeamMemberHandler {
    organizations: Arc<dyn OrganizationRepository>,
}

impl RemoveTeamMemberHandler {
    pub fn new(organizations: Arc<dyn OrganizationRepository>) -> Self {
        Self { organizations }
    }

    pub async fn handle(&self, cmd: RemoveTeamMemberCommand) -> Result<(), DomainError> {
        let (team, organization) =
            load_team_with_org(self.organizations.as_ref(), &cmd.team_id).await?;
        if cmd.actor.user_id != cmd.user_id {
            ensure_roster_manager(self.organizations.as_ref(), &team, &organization, &cmd.actor)
                .await?;
        }

        if !self
            .organizations
            .remove_member(&team.id, &cmd.user_id)
            .await?
        {
            return Err(DomainError::new(
                ErrorCode::TeamNotFound,
                format!("{} is not on team {}", cmd.user_id, team.name),
            ));
        }
        Ok(())
    }
}

pub struct ListTeamsHandler {
    organizations: Arc<dyn OrganizationRepository>,
}

impl ListTeamsHandler {
    pub fn new(organizations: Arc<dyn OrganizationRepository>) -> Self {
        Self { organizations }
    }

    pub async fn handle(&self, organization_id: OrganizationId) -> Result<Vec<Team>, DomainError> {
        load_organization(self.organizations.as_ref(), &organization_id).await?;
        self.organizations.list_teams(&organization_id).await
    }
}

pub struct ListTeamMembersHandler {
    organizations: Arc<dyn OrganizationRepository>,
}

impl ListTeamMembersHandler {
    pub fn new(organizations: Arc<dyn OrganizationRepository>) -> Self {
        Self { organizations }
    }

    pub async fn handle(&self, team_id: TeamId) -> Result<Vec<TeamMember>, DomainError> {
        let (team, _) = load_team_with_org(self.organizations.as_ref(), &team_id).await?;
        self.organizations.list_members(&team.id).await
    }
}
