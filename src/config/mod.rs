//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the `config` and
//! `dotenvy` crates. Variables use the `CAR_AUDIO_EVENTS` prefix and `__` between
//! nested keys.
//!
//! # Example
//!
//! ```no_run
//! use car_audio_events::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod auth;
mod database;
mod email;
mod error;
mod geocoding;
mod payment;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use email::{EmailConfig, EmailProviderKind};
pub use error::{ConfigError, ValidationError};
pub use geocoding::GeocodingConfig;
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    pub payment: PaymentConfig,

    pub email: EmailConfig,

    #[serde(default)]
    pub geocoding: GeocodingConfig,
}

impl AppConfig {
    /// Load and validate configuration.
    ///
    /// 1. Loads `.env` if present
    /// 2. Reads `CAR_AUDIO_EVENTS__*` variables (`CAR_AUDIO_EVENTS__SERVER__PORT=8080`
    ///    becomes `server.port`)
    /// 3. Deserializes into the typed sections
    /// 4. Runs [`AppConfig::validate`]
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CAR_AUDIO_EVENTS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.payment.validate()?;
        self.email.validate()?;
        self.geocoding.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Environment variables are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[(&str, &str)] = &[
        (
            "CAR_AUDIO_EVENTS__DATABASE__URL",
            "postgresql://events@localhost/car_audio_events",
        ),
        ("CAR_AUDIO_EVENTS__AUTH__JWT_SECRET", "local-dev-secret"),
        ("CAR_AUDIO_EVENTS__PAYMENT__STRIPE_API_KEY", "sk_test_xxx"),
        ("CAR_AUDIO_EVENTS__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx"),
        ("CAR_AUDIO_EVENTS__EMAIL__RESEND_API_KEY", "re_xxx"),
    ];

    const OPTIONAL: &[&str] = &[
        "CAR_AUDIO_EVENTS__SERVER__PORT",
        "CAR_AUDIO_EVENTS__SERVER__ENVIRONMENT",
        "CAR_AUDIO_EVENTS__AUTH__INACTIVITY_TIMEOUT_MINUTES",
        "CAR_AUDIO_EVENTS__EMAIL__PRIMARY_PROVIDER",
    ];

    fn set_minimal_env() {
        for (key, value) in VARS {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in VARS {
            env::remove_var(key);
        }
        for key in OPTIONAL {
            env::remove_var(key);
        }
    }

    #[test]
    fn loads_minimal_environment_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(
            config.database.url,
            "postgresql://events@localhost/car_audio_events"
        );
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.inactivity_timeout_minutes, 30);
        assert_eq!(config.email.primary_provider, EmailProviderKind::Resend);
        assert_eq!(config.payment.currency, "usd");
        assert!(config.geocoding.google_api_key.is_none());
    }

    #[test]
    fn nested_overrides_are_applied() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CAR_AUDIO_EVENTS__SERVER__PORT", "3000");
        env::set_var("CAR_AUDIO_EVENTS__AUTH__INACTIVITY_TIMEOUT_MINUTES", "5");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.inactivity_timeout_minutes, 5);
    }

    #[test]
    fn invalid_values_fail_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CAR_AUDIO_EVENTS__EMAIL__PRIMARY_PROVIDER", "postmark");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn production_flag_follows_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CAR_AUDIO_EVENTS__SERVER__ENVIRONMENT", "production");
        env::set_var("CAR_AUDIO_EVENTS__AUTH__JWT_SECRET", "x".repeat(48));
        let result = AppConfig::load();
        clear_env();

        assert!(result.expect("config should load").is_production());
    }
}
