//! Organization creation and lookup.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, OrganizationId, UserId};
use crate::domain::organization::Organization;
use crate::ports::OrganizationRepository;

fn organization_not_found(id: &OrganizationId) -> DomainError {
    DomainError::new(
        ErrorCode::OrganizationNotFound,
        format!("Organization {} not found", id),
    )
}

pub(crate) async fn load_organization(
    organizations: &dyn OrganizationRepository,
    id: &OrganizationId,
) -> Result<Organization, DomainError> {
    organizations
        .find_organization(id)
        .await?
        .ok_or_else(|| organization_not_found(id))
}

#[derive(Debug, Clone)]
pub struct CreateOrganizationCommand {
    pub owner_id: UserId,
    pub name: String,
    /// Derived from the name when absent.
    pub slug: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

/// Any signed-in user may start an organization. Slugs are unique; a taken
/// slug is a `Conflict`.
pub struct CreateOrganizationHandler {
    organizations: Arc<dyn OrganizationRepository>,
}

impl CreateOrganizationHandler {
    pub fn new(organizations: Arc<dyn OrganizationRepository>) -> Self {
        Self { organizations }
    }

    pub async fn handle(&self, cmd: CreateOrganizationCommand) -> Result<Organization, DomainError> {
        let organization = Organization::create(
            cmd.owner_id,
            cmd.name,
            cmd.slug,
            cmd.description,
            cmd.website,
        )?;
        self.organizations.save_organization(&organization).await?;
        tracing::info!(
            organization_id = %organization.id,
            slug = %organization.slug,
            "Organization created"
        );
        Ok(organization)
    }
}

pub struct GetOrganizationHandler {
    organizations: Arc<dyn OrganizationRepository>,
}

impl GetOrganizationHandler {
    pub fn new(organizations: Arc<dyn OrganizationRepository>) -> Self {
        Self { organizations }
    }

    pub async fn handle(&self, id: OrganizationId) -> Result<Organization, DomainError> {
        load_organization(self.organizations.as_ref(), &id).await
    }
}

/// Organizations the user owns or belongs to through a team.
pub struct ListMyOrganizationsHandler {
    organizations: Arc<dyn OrganizationRepository>,
}

impl ListMyOrganizationsHandler {
    pub fn new(organizations: Arc<dyn OrganizationRepository>) -> Self {
        Self { organizations }
    }

    pub async fn handle(&self, user_id: UserId) -> Result<Vec<Organization>, DomainError> {
        self.organizations.list_for_user(&user_id).await
    }
}
