//! Support ticket handlers.
//!
//! ## Commands
//! - Opening a ticket (signed in or anonymous)
//! - Admin status updates
//!
//! ## Queries
//! - Tickets visible to the caller

mod tickets;

// Commands
pub use tickets::{
    CreateTicketCommand, CreateTicketHandler, UpdateTicketStatusCommand,
    UpdateTicketStatusHandler,
};

// Queries
pub use tickets::ListTicketsHandler;
