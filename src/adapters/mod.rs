//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Bearer token validation (HS256 JWT, admin API token)
//! - `email` - Resend and Postmark senders with failover
//! - `geocoding` - Google and Nominatim with fallback
//! - `http` - axum REST API
//! - `memory` - In-memory repositories for tests and local runs
//! - `postgres` - PostgreSQL repositories
//! - `stripe` - Stripe payment provider

pub mod auth;
pub mod email;
pub mod geocoding;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
