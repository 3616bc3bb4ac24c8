//! HTTP adapter for support tickets.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::support_routes;
