//! Clubs, shops and sponsors that field teams of competitors.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    str_enum, DomainError, OrganizationId, TeamId, Timestamp, UserId, ValidationError,
};

const MAX_SLUG_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    /// Lowercase kebab-case handle, unique across organizations.
    pub slug: String,
    pub owner_id: UserId,
    pub description: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Organization {
    /// Creates an organization. The slug is derived from the name unless given.
    pub fn create(
        owner_id: UserId,
        name: impl Into<String>,
        slug: Option<String>,
        description: Option<String>,
        website: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let slug = match slug {
            Some(slug) => {
                validate_slug(&slug)?;
                slug
            }
            None => slugify(&name),
        };
        validate_slug(&slug)?;
        let now = Timestamp::now();
        Ok(Self {
            id: OrganizationId::new(),
            name,
            slug,
            owner_id,
            description,
            website,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }
}

/// Lowercase kebab-case form of `name`: ASCII alphanumerics separated by single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(MAX_SLUG_LEN);
    slug.trim_end_matches('-').to_string()
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let valid = !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::invalid_format(
            "slug",
            "must be lowercase letters, digits and single dashes",
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub organization_id: OrganizationId,
    /// Unique within the organization.
    pub name: String,
    pub created_at: Timestamp,
}

impl Team {
    pub fn create(
        organization: &Organization,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id: TeamId::new(),
            organization_id: organization.id,
            name,
            created_at: Timestamp::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Captain,
    Member,
}

str_enum!(TeamRole {
    Captain => "captain",
    Member => "member",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub team_id: TeamId,
    pub user_id: UserId,
    pub role: TeamRole,
    pub joined_at: Timestamp,
}

impl TeamMember {
    pub fn new(team_id: TeamId, user_id: UserId, role: TeamRole) -> Self {
        Self {
            team_id,
            user_id,
            role,
            joined_at: Timestamp::now(),
        }
    }
}

/// Whether `actor` may change the roster of a team.
///
/// Organization owners always can; otherwise the actor must captain the team.
pub fn can_manage_roster(
    organization: &Organization,
    roster: &[TeamMember],
    actor: &UserId,
) -> Result<(), DomainError> {
    if organization.is_owner(actor) {
        return Ok(());
    }
    let is_captain = roster
        .iter()
        .any(|m| &m.user_id == actor && m.role == TeamRole::Captain);
    if is_captain {
        Ok(())
    } else {
        Err(DomainError::forbidden(
            "Only the organization owner or a team captain can manage the roster",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> UserId {
        UserId::new("owner-1").unwrap()
    }

    #[test]
    fn slug_is_derived_from_name() {
        assert_eq!(slugify("  Low Hz Crew!! (Tampa) "), "low-hz-crew-tampa");
        assert_eq!(slugify("DB Drag"), "db-drag");
    }

    #[test]
    fn derived_slug_is_always_valid() {
        for name in ["Team 1", "---", "a--b", "Über Bass"] {
            let slug = slugify(name);
            if !slug.is_empty() {
                validate_slug(&slug).unwrap();
            }
        }
    }

    #[test]
    fn explicit_slug_must_be_kebab_case() {
        assert!(validate_slug("Low-Hz").is_err());
        assert!(validate_slug("low--hz").is_err());
        assert!(validate_slug("-low").is_err());
        assert!(validate_slug("low-hz-2").is_ok());
    }

    #[test]
    fn name_without_slug_characters_is_rejected() {
        assert!(Organization::create(owner(), "!!!", None, None, None).is_err());
    }

    #[test]
    fn owner_and_captain_manage_roster() {
        let org = Organization::create(owner(), "Low Hz Crew", None, None, None).unwrap();
        let team = Team::create(&org, "Street A").unwrap();
        let captain = UserId::new("cap").unwrap();
        let member = UserId::new("mem").unwrap();
        let roster = vec![
            TeamMember::new(team.id, captain.clone(), TeamRole::Captain),
            TeamMember::new(team.id, member.clone(), TeamRole::Member),
        ];
        assert!(can_manage_roster(&org, &roster, &owner()).is_ok());
        assert!(can_manage_roster(&org, &roster, &captain).is_ok());
        assert!(can_manage_roster(&org, &roster, &member).is_err());
    }
}
