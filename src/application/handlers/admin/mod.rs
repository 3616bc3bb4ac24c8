//! Admin-only queries not owned by another module.
//!
//! Approval commands live with their aggregates (events, accounts, directory).
//!
//! ## Commands
//! - Coordinate backfill for events and listings
//!
//! ## Queries
//! - Recent audit log entries

mod audit_log;
mod backfill_coordinates;

pub use audit_log::{ListAuditLogHandler, DEFAULT_AUDIT_LIMIT, MAX_AUDIT_LIMIT};
pub use backfill_coordinates::{BackfillCoordinatesHandler, BackfillReport};
