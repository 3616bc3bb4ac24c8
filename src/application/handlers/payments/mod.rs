//! Payment handlers.
//!
//! ## Commands
//! - Creating a payment intent for an entry fee
//! - Applying processor webhooks (success, failure, refunds)
//! - Refunding a payment
//! - Changing or cancelling a business subscription
//!
//! ## Queries
//! - Payment attempts for a registration
//! - Saved payment methods

mod billing;
mod create_intent;
mod query_payments;
mod refund;
mod webhook;

// Commands
pub use billing::{SubscriptionChange, UpdateSubscriptionCommand, UpdateSubscriptionHandler};
pub use create_intent::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, CreatePaymentIntentResult,
};
pub use refund::{RefundPaymentCommand, RefundPaymentHandler, RefundPaymentResult};
pub use webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};

// Queries
pub use billing::ListPaymentMethodsHandler;
pub use query_payments::{ListPaymentsHandler, ListPaymentsQuery};
