//! HTTP adapter for judging sessions.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::scoring_routes;
