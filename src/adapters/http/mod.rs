//! HTTP adapter - the axum REST API.
//!
//! Each area has its own `dto` / `handlers` / `routes` modules; `router`
//! assembles them behind the auth and inactivity middleware.

pub mod accounts;
pub mod admin;
pub mod directory;
pub mod email;
pub mod error;
pub mod events;
pub mod health;
pub mod middleware;
pub mod organizations;
pub mod payments;
pub mod registrations;
pub mod router;
pub mod scoring;
pub mod state;
pub mod support;

pub use error::{ApiError, ErrorResponse};
pub use router::{api_routes, build_router, spawn_email_poller};
pub use state::{ApiSettings, AppState};
