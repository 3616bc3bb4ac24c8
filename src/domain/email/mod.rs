//! Outbound email: message values, the persistent queue and notification templates.

mod message;
mod queued;
pub mod templates;

pub use message::EmailMessage;
pub use queued::{EmailStatus, QueuedEmail, ATTEMPTS_EXHAUSTED};
