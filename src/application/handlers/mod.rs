//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations through the
//! ports. Each module groups the handlers of one area of the platform.

pub mod accounts;
pub mod admin;
pub mod analytics;
pub mod directory;
pub mod email;
pub mod events;
pub mod organizations;
pub mod payments;
pub mod registrations;
pub mod scoring;
pub mod support;

#[cfg(test)]
pub(crate) mod test_support;
