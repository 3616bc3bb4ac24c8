//! HTTP adapter for the admin console.
//!
//! Every route here requires an admin account or the admin API token.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::admin_routes;
