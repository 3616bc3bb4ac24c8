//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, money, error types and the state machine trait
//! shared by every car audio events aggregate.

mod auth;
mod enums;
mod errors;
mod ids;
mod money;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub(crate) use enums::str_enum;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    AuditEntryId, CheckInId, EmailId, EventId, JudgeScoreId, ListingId, OrganizationId,
    PaymentId, RefundId, RegistrationId, ResultId, ScoringSessionId, TeamId, TicketId, UserId,
};
pub use money::Money;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
