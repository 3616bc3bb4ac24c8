//! HTTP adapter for admin email sending and queue processing.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::email_routes;
