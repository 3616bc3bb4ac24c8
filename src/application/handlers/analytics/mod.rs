//! Analytics handlers.
//!
//! ## Queries
//! - Registration, revenue and attendance figures for one event or all events

mod event_analytics;

pub use event_analytics::{GetEventAnalyticsHandler, GetEventAnalyticsQuery};
