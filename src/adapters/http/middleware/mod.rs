//! HTTP middleware for axum.
//!
//! - `auth` - Bearer token validation and the caller extractors
//! - `inactivity` - Idle-session force logout

pub mod auth;
pub mod inactivity;

pub use auth::{auth_middleware, AuthState, OptionalAuth, RequireActor, RequireAdmin, RequireAuth};
pub use inactivity::{
    inactivity_middleware, spawn_inactivity_sweeper, InactivityTracker, SessionKey,
};
