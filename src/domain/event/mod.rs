//! Competition events: listing, approval workflow and pricing.

mod aggregate;
mod status;

pub use aggregate::{Event, EventDetails, DEFAULT_MAX_COMPETITORS, MAX_COMPETITORS_LIMIT};
pub use status::{EventStatus, EventType};

#[cfg(test)]
pub(crate) use aggregate::tests::{date, sample_details};
