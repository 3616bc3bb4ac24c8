//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! Each adapter owns a clone of the shared `PgPool`. Schema lives in
//! `migrations/` and is applied at startup with `sqlx::migrate!`.

mod analytics_reader;
mod audit_log;
mod directory_repository;
mod email_queue;
mod event_repository;
mod health_check;
mod organization_repository;
mod payment_repository;
mod profile_repository;
mod registration_repository;
mod rows;
mod scoring_repository;
mod support_repository;

pub use analytics_reader::PostgresAnalyticsReader;
pub use audit_log::PostgresAuditLog;
pub use directory_repository::PostgresDirectoryRepository;
pub use email_queue::PostgresEmailQueue;
pub use event_repository::PostgresEventRepository;
pub use health_check::PostgresHealthCheck;
pub use organization_repository::PostgresOrganizationRepository;
pub use payment_repository::PostgresPaymentRepository;
pub use profile_repository::PostgresProfileRepository;
pub use registration_repository::PostgresRegistrationRepository;
pub use scoring_repository::PostgresScoringRepository;
pub use support_repository::PostgresSupportTicketRepository;
