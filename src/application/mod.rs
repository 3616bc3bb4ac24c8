//! Application layer - commands, queries and their handlers.
//!
//! Handlers resolve permissions through [`Actor`], perform the primary write
//! through a port, then run best-effort side effects (audit, queued email).

pub mod authorization;
pub mod handlers;
pub(crate) mod side_effects;

pub use authorization::Actor;
