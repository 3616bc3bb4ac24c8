//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::InactivityTracker;
use crate::application::handlers::email::{ProcessEmailQueueHandler, QueueSettings};
use crate::application::Actor;
use crate::domain::foundation::AuthenticatedUser;
use crate::ports::{
    AnalyticsReader, AuditLog, DirectoryRepository, EmailQueue, EmailSender, EventRepository,
    Geocoder, HealthCheck, OrganizationRepository, PaymentProvider, PaymentRepository,
    ProfileRepository, RegistrationRepository, ScoringRepository, SessionValidator,
    SupportTicketRepository,
};

/// Non-port settings the handlers need.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// ISO currency for new payment intents.
    pub currency: String,
    pub email_queue: QueueSettings,
    /// Allowed CORS origins; empty allows any origin.
    pub cors_origins: Vec<String>,
    pub request_timeout: std::time::Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            currency: "usd".to_string(),
            email_queue: QueueSettings::default(),
            cors_origins: Vec::new(),
            request_timeout: std::time::Duration::from_secs(30),
        }
    }
}

/// Cloned per request; every dependency is an `Arc`.
///
/// Application handlers are built on demand from these ports.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventRepository>,
    pub registrations: Arc<dyn RegistrationRepository>,
    pub scoring: Arc<dyn ScoringRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub organizations: Arc<dyn OrganizationRepository>,
    pub directory: Arc<dyn DirectoryRepository>,
    pub tickets: Arc<dyn SupportTicketRepository>,
    pub audit: Arc<dyn AuditLog>,
    pub analytics: Arc<dyn AnalyticsReader>,
    pub email_queue: Arc<dyn EmailQueue>,
    pub email_sender: Arc<dyn EmailSender>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub geocoder: Arc<dyn Geocoder>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub health: Arc<dyn HealthCheck>,
    pub sessions: Arc<InactivityTracker>,
    pub settings: ApiSettings,
}

impl AppState {
    pub async fn resolve_actor(&self, user: &AuthenticatedUser) -> Result<Actor, ApiError> {
        Ok(Actor::resolve(user, self.profiles.as_ref()).await?)
    }

    pub async fn optional_actor(
        &self,
        user: Option<&AuthenticatedUser>,
    ) -> Result<Option<Actor>, ApiError> {
        match user {
            Some(user) => Ok(Some(self.resolve_actor(user).await?)),
            None => Ok(None),
        }
    }

    /// Shared by the admin trigger endpoint and the background poller.
    pub fn process_email_queue_handler(&self) -> ProcessEmailQueueHandler {
        ProcessEmailQueueHandler::new(
            self.email_queue.clone(),
            self.email_sender.clone(),
            self.settings.email_queue,
        )
    }
}
