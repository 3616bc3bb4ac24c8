//! HTTP adapter for registrations, check-in and entry-fee payments.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::registration_routes;
