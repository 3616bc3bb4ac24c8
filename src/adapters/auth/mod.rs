//! Authentication adapters implementing the `SessionValidator` port:
//!
//! - `jwt` - HS256 tokens from the hosted auth service, plus the admin API token
//! - `mock` - Test implementation that doesn't require real tokens

mod jwt;
mod mock;

pub use jwt::{JwtConfig, JwtSessionValidator, SERVICE_ADMIN_SUBJECT};
pub use mock::MockSessionValidator;
