//! HTTP adapter for events and the event-scoped endpoints.
//!
//! Covers the event lifecycle, plus registration, scoring sessions, results
//! and analytics for a single event.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::AnalyticsParams;
pub use routes::event_routes;
