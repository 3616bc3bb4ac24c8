//! Organization and team handlers.
//!
//! ## Commands
//! - Creating organizations and teams
//! - Adding and removing team members
//!
//! ## Queries
//! - One organization, the caller's organizations
//! - Teams of an organization, members of a team

mod manage_organization;
mod manage_team;

// Commands
pub use manage_organization::{CreateOrganizationCommand, CreateOrganizationHandler};
pub use manage_team::{
    AddTeamMemberCommand, AddTeamMemberHandler, CreateTeamCommand, CreateTeamHandler,
    RemoveTeamMemberCommand, RemoveTeamMemberHandler,
};

// Queries
pub use manage_organization::{GetOrganizationHandler, ListMyOrganizationsHandler};
pub use manage_team::{ListTeamMembersHandler, ListTeamsHandler};
