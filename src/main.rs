//! Car Audio Events API server.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use car_audio_events::adapters::auth::{JwtConfig, JwtSessionValidator};
use car_audio_events::adapters::email::{
    FailoverEmailSender, PostmarkEmailSender, ResendEmailSender,
};
use car_audio_events::adapters::geocoding::{
    FallbackGeocoder, GoogleGeocoder, GoogleGeocoderConfig, NominatimConfig, NominatimGeocoder,
};
use car_audio_events::adapters::http::middleware::{spawn_inactivity_sweeper, InactivityTracker};
use car_audio_events::adapters::http::{build_router, spawn_email_poller, ApiSettings, AppState};
use car_audio_events::adapters::postgres::{
    PostgresAnalyticsReader, PostgresAuditLog, PostgresDirectoryRepository, PostgresEmailQueue,
    PostgresEventRepository, PostgresHealthCheck, PostgresOrganizationRepository,
    PostgresPaymentRepository, PostgresProfileRepository, PostgresRegistrationRepository,
    PostgresScoringRepository, PostgresSupportTicketRepository,
};
use car_audio_events::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use car_audio_events::application::handlers::email::QueueSettings;
use car_audio_events::config::{AppConfig, EmailConfig, EmailProviderKind};
use car_audio_events::ports::EmailSender;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", config.server.log_level)));
    if config.server.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn email_provider(kind: EmailProviderKind, config: &EmailConfig) -> Arc<dyn EmailSender> {
    match kind {
        EmailProviderKind::Resend => Arc::new(ResendEmailSender::new(
            config.resend_api_key.clone(),
            config.from_header(),
        )),
        EmailProviderKind::Postmark => Arc::new(PostmarkEmailSender::new(
            config.postmark_server_token.clone(),
            config.from_header(),
        )),
    }
}

fn email_sender(config: &EmailConfig) -> Arc<dyn EmailSender> {
    let sender = FailoverEmailSender::new(email_provider(config.primary_provider, config));
    match config.secondary_provider() {
        Some(kind) => Arc::new(sender.with_secondary(email_provider(kind, config))),
        None => Arc::new(sender),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);

    tracing::info!(
        environment = ?config.server.environment,
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    // Database
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Migrations applied");
    }

    // Providers
    let payment_provider = Arc::new(StripePaymentAdapter::new(
        StripeConfig::new(
            config.payment.stripe_api_key.clone(),
            config.payment.stripe_webhook_secret.clone(),
        )
        .with_base_url(config.payment.api_base_url.clone())
        .with_require_livemode(config.server.is_production() && !config.payment.is_test_mode()),
    ));

    let geo = &config.geocoding;
    let geocoder = Arc::new(
        FallbackGeocoder::new(Arc::new(GoogleGeocoder::new(
            GoogleGeocoderConfig::new(geo.google_api_key.clone())
                .with_base_url(geo.google_base_url.clone())
                .with_timeout(geo.request_timeout()),
        )))
        .with_secondary(Arc::new(NominatimGeocoder::new(
            NominatimConfig::new(geo.nominatim_base_url.clone(), geo.user_agent.clone())
                .with_timeout(geo.request_timeout()),
        )))
        .with_batch_delay(geo.batch_delay()),
    );

    let session_validator = Arc::new(JwtSessionValidator::new(
        JwtConfig::new(config.auth.jwt_secret.clone(), config.auth.jwt_audience.clone())
            .with_issuer(config.auth.jwt_issuer.clone())
            .with_admin_token(config.auth.admin_api_token.clone()),
    ));

    let sessions = Arc::new(InactivityTracker::from_minutes(
        config.auth.inactivity_timeout_minutes,
    ));

    let state = AppState {
        events: Arc::new(PostgresEventRepository::new(pool.clone())),
        registrations: Arc::new(PostgresRegistrationRepository::new(pool.clone())),
        scoring: Arc::new(PostgresScoringRepository::new(pool.clone())),
        profiles: Arc::new(PostgresProfileRepository::new(pool.clone())),
        payments: Arc::new(PostgresPaymentRepository::new(pool.clone())),
        organizations: Arc::new(PostgresOrganizationRepository::new(pool.clone())),
        directory: Arc::new(PostgresDirectoryRepository::new(pool.clone())),
        tickets: Arc::new(PostgresSupportTicketRepository::new(pool.clone())),
        audit: Arc::new(PostgresAuditLog::new(pool.clone())),
        analytics: Arc::new(PostgresAnalyticsReader::new(pool.clone())),
        email_queue: Arc::new(PostgresEmailQueue::new(pool.clone())),
        email_sender: email_sender(&config.email),
        payment_provider,
        geocoder,
        session_validator,
        health: Arc::new(PostgresHealthCheck::new(pool.clone())),
        sessions: sessions.clone(),
        settings: ApiSettings {
            currency: config.payment.currency.clone(),
            email_queue: QueueSettings {
                batch_size: config.email.queue_batch_size,
                max_attempts: config.email.max_attempts,
                ..QueueSettings::default()
            },
            cors_origins: config.server.cors_origins_list(),
            request_timeout: config.server.request_timeout(),
        },
    };

    // Background jobs
    if let Some(every) = config.email.poll_interval() {
        spawn_email_poller(state.clone(), every);
    }
    if sessions.is_enabled() {
        spawn_inactivity_sweeper(sessions, config.auth.sweep_interval());
    }

    let app = build_router(state);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
