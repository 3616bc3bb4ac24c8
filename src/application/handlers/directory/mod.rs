//! Business directory handlers.
//!
//! ## Commands
//! - Creating a listing (business accounts, geocoded best-effort)
//! - Admin review of pending listings
//! - Deactivating a listing
//!
//! ## Queries
//! - Listing the directory (public view or admin view by status)

mod manage_listing;

// Commands
pub use manage_listing::{
    CreateListingCommand, CreateListingHandler, DeactivateListingCommand,
    DeactivateListingHandler, ListingDecision, ReviewListingCommand, ReviewListingHandler,
};

// Queries
pub use manage_listing::{ListListingsHandler, ListListingsQuery};
