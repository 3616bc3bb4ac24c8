//! PostgreSQL implementation of OrganizationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, OrganizationId, TeamId, Timestamp, UserId};
use crate::domain::organization::{Organization, Team, TeamMember};
use crate::ports::OrganizationRepository;

use super::rows::{is_unique_violation, parse_column};

pub struct PostgresOrganizationRepository {
    pool: PgPool,
}

impl PostgresOrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrganizationRow {
    id: Uuid,
    name: String,
    slug: String,
    owner_id: String,
    description: Option<String>,
    website: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrganizationRow> for Organization {
    type Error = DomainError;

    fn try_from(row: OrganizationRow) -> Result<Self, Self::Error> {
        Ok(Organization {
            id: OrganizationId::from_uuid(row.id),
            name: row.name,
            slug: row.slug,
            owner_id: parse_column("owner_id", &row.owner_id)?,
            description: row.description,
            website: row.website,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TeamRow {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team {
            id: TeamId::from_uuid(row.id),
            organization_id: OrganizationId::from_uuid(row.organization_id),
            name: row.name,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    team_id: Uuid,
    user_id: String,
    role: String,
    joined_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for TeamMember {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(TeamMember {
            team_id: TeamId::from_uuid(row.team_id),
            user_id: parse_column("user_id", &row.user_id)?,
            role: parse_column("role", &row.role)?,
            joined_at: Timestamp::from_datetime(row.joined_at),
        })
    }
}

const SELECT_ORGANIZATION: &str = r#"
    SELECT o.id, o.name, o.slug, o.owner_id, o.description, o.website, o.is_active,
           o.created_at, o.updated_at
    FROM organizations o
"#;

#[async_trait]
impl OrganizationRepository for PostgresOrganizationRepository {
    async fn save_organization(&self, organization: &Organization) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO organizations (
                id, name, slug, owner_id, description, website, is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(organization.id.as_uuid())
        .bind(&organization.name)
        .bind(&organization.slug)
        .bind(organization.owner_id.as_str())
        .bind(&organization.description)
        .bind(&organization.website)
        .bind(organization.is_active)
        .bind(organization.created_at.as_datetime())
        .bind(organization.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return DomainError::new(
                    ErrorCode::Conflict,
                    format!("Organization slug '{}' is taken", organization.slug),
                );
            }
            DomainError::database("Failed to save organization", e)
        })?;

        Ok(())
    }

    async fn find_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, DomainError> {
        let row: Option<OrganizationRow> =
            sqlx::query_as(&format!("{} WHERE o.id = $1", SELECT_ORGANIZATION))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to fetch organization", e))?;

        row.map(Organization::try_from).transpose()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Organization>, DomainError> {
        let sql = format!(
            r#"{}
            WHERE o.owner_id = $1
               OR EXISTS (
                   SELECT 1 FROM teams t
                   JOIN team_members m ON m.team_id = t.id
                   WHERE t.organization_id = o.id AND m.user_id = $1
               )
            ORDER BY o.name ASC
            "#,
            SELECT_ORGANIZATION
        );
        let rows: Vec<OrganizationRow> = sqlx::query_as(&sql)
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list organizations", e))?;

        rows.into_iter().map(Organization::try_from).collect()
    }

    async fn save_team(&self, team: &Team) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO teams (id, organization_id, name, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(team.id.as_uuid())
        .bind(team.organization_id.as_uuid())
        .bind(&team.name)
        .bind(team.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return DomainError::new(
                    ErrorCode::Conflict,
                    format!("Team '{}' already exists", team.name),
                );
            }
            DomainError::database("Failed to save team", e)
        })?;

        Ok(())
    }

    async fn find_team(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let row: Option<TeamRow> = sqlx::query_as(
            "SELECT id, organization_id, name, created_at FROM teams WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch team", e))?;

        Ok(row.map(Team::from))
    }

    async fn list_teams(&self, organization_id: &OrganizationId) -> Result<Vec<Team>, DomainError> {
        let rows: Vec<TeamRow> = sqlx::query_as(
            r#"
            SELECT id, organization_id, name, created_at
            FROM teams
            WHERE organization_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(organization_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list teams", e))?;

        Ok(rows.into_iter().map(Team::from).collect())
    }

    async fn add_member(&self, member: &TeamMember) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO team_members (team_id, user_id, role, joined_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(member.team_id.as_uuid())
        .bind(member.user_id.as_str())
        .bind(member.role.as_str())
        .bind(member.joined_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return DomainError::new(ErrorCode::Conflict, "User is already on the team");
            }
            DomainError::database("Failed to add team member", e)
        })?;

        Ok(())
    }

    async fn remove_member(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id.as_uuid())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to remove team member", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_members(&self, team_id: &TeamId) -> Result<Vec<TeamMember>, DomainError> {
        let rows: Vec<MemberRow> = sqlx::query_as(
            r#"
            SELECT team_id, user_id, role, joined_at
            FROM team_members
            WHERE team_id = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(team_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list team members", e))?;

        rows.into_iter().map(TeamMember::try_from).collect()
    }
}
