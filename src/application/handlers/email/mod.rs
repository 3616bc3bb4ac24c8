//! Email handlers.
//!
//! ## Commands
//! - Sending an email immediately (admin)
//! - Queuing an email (admin)
//! - Processing due queued emails

mod process_queue;
mod send_email;

pub use process_queue::{ProcessEmailQueueHandler, ProcessQueueResult, QueueSettings};
pub use send_email::{EnqueueEmailCommand, EnqueueEmailHandler, SendEmailCommand, SendEmailHandler};
