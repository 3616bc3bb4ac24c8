//! Registration handlers.
//!
//! ## Commands
//! - Registering for an event (capacity, duplicate and window checks)
//! - Approving and cancelling registrations
//! - Checking competitors in at the venue
//!
//! ## Queries
//! - Listing registrations by event, user or status
//! - Fetching one registration

mod manage_registration;
mod query_registrations;
mod register_competitor;

// Commands
pub use manage_registration::{
    ApproveRegistrationCommand, ApproveRegistrationHandler, CancelRegistrationCommand,
    CancelRegistrationHandler, CheckInCommand, CheckInHandler,
};
pub use register_competitor::{RegisterCompetitorCommand, RegisterCompetitorHandler};

// Queries
pub use query_registrations::{
    GetRegistrationHandler, GetRegistrationQuery, ListRegistrationsHandler,
    ListRegistrationsQuery,
};

pub(crate) use query_registrations::{load_with_event, registration_not_found};
