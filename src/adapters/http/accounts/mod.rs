//! HTTP adapter for the sign-in gate and the caller's own profile.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{auth_routes, profile_routes};
