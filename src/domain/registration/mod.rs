//! Competitor registrations and venue check-ins.

mod aggregate;
mod status;

pub use aggregate::{is_plausible_email, CheckIn, CompetitorEntry, Registration};
pub use status::RegistrationStatus;

#[cfg(test)]
pub(crate) use aggregate::tests::sample_entry;
