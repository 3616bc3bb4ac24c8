//! HTTP adapter for refunds, billing and the payment processor webhook.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{payment_routes, subscription_routes, webhook_routes};
