//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Repository Ports
//!
//! - `EventRepository`, `RegistrationRepository`, `ScoringRepository`
//! - `ProfileRepository`, `PaymentRepository`, `EmailQueue`
//! - `OrganizationRepository`, `DirectoryRepository`, `SupportTicketRepository`
//! - `AuditLog`, `AnalyticsReader`
//!
//! ## External Service Ports
//!
//! - `SessionValidator` - Bearer token validation
//! - `PaymentProvider` - Card processor (intents, refunds, subscriptions, webhooks)
//! - `EmailSender` - Transactional email delivery
//! - `Geocoder` - Address to coordinates
//! - `HealthCheck` - Store readiness for `/health`

mod analytics_reader;
mod audit_log;
mod directory_repository;
mod email_queue;
mod email_sender;
mod event_repository;
mod geocoder;
mod health_check;
mod organization_repository;
mod payment_provider;
mod payment_repository;
mod profile_repository;
mod registration_repository;
mod scoring_repository;
mod session_validator;
mod support_repository;

pub use analytics_reader::AnalyticsReader;
pub use audit_log::AuditLog;
pub use directory_repository::{DirectoryRepository, ListingFilter};
pub use email_queue::EmailQueue;
pub use email_sender::{EmailError, EmailSender, SentEmail};
pub use event_repository::{
    clamp_limit, EventFilter, EventRepository, DEFAULT_EVENT_LIMIT, MAX_EVENT_LIMIT,
};
pub use geocoder::Geocoder;
pub use health_check::HealthCheck;
pub use organization_repository::OrganizationRepository;
pub use payment_provider::{
    CreatePaymentIntentRequest, CreateRefundRequest, PaymentError, PaymentErrorCode,
    PaymentIntent, PaymentMethod, PaymentProvider, ProviderRefund, Subscription,
    SubscriptionStatus, WebhookEvent, WebhookEventData, WebhookEventType,
};
pub use payment_repository::PaymentRepository;
pub use profile_repository::ProfileRepository;
pub use registration_repository::{RegistrationFilter, RegistrationRepository};
pub use scoring_repository::ScoringRepository;
pub use session_validator::SessionValidator;
pub use support_repository::SupportTicketRepository;
