//! HTTP adapter for organizations and their teams.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{organization_routes, team_routes};
