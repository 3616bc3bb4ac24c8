//! Entry-fee payments and refunds.

mod aggregate;
mod status;

pub use aggregate::{Payment, Refund};
pub use status::PaymentStatus;
