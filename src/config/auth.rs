//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Token validation and session policy.
///
/// Access tokens are HS256 JWTs signed by the hosted auth service with a shared secret.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 signing secret
    pub jwt_secret: String,

    /// Expected `iss` claim, unchecked when absent
    pub jwt_issuer: Option<String>,

    /// Expected `aud` claim
    #[serde(default = "default_audience")]
    pub jwt_audience: String,

    /// Idle minutes before a session is force-logged-out. 0 disables the policy.
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout_minutes: u64,

    /// How often idle sessions are swept
    #[serde(default = "default_sweep_interval")]
    pub inactivity_sweep_secs: u64,

    /// Static bearer token granting service-admin access (batch triggers, tooling)
    pub admin_api_token: Option<String>,
}

impl AuthConfig {
    /// `None` when the inactivity policy is disabled.
    pub fn inactivity_timeout(&self) -> Option<Duration> {
        (self.inactivity_timeout_minutes > 0)
            .then(|| Duration::from_secs(self.inactivity_timeout_minutes * 60))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.inactivity_sweep_secs.max(1))
    }

    /// Short secrets are tolerated outside production so local stacks can use
    /// the hosted service's demo secret.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if *environment == Environment::Production {
            if self.jwt_secret.len() < 32 {
                return Err(ValidationError::JwtSecretTooShort);
            }
            if matches!(&self.admin_api_token, Some(token) if token.len() < 32) {
                return Err(ValidationError::AdminTokenTooShort);
            }
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: None,
            jwt_audience: default_audience(),
            inactivity_timeout_minutes: default_inactivity_timeout(),
            inactivity_sweep_secs: default_sweep_interval(),
            admin_api_token: None,
        }
    }
}

fn default_audience() -> String {
    "authenticated".to_string()
}

fn default_inactivity_timeout() -> u64 {
    30
}

fn default_sweep_interval() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactivity_defaults_to_thirty_minutes() {
        let config = AuthConfig::default();
        assert_eq!(config.inactivity_timeout(), Some(Duration::from_secs(1800)));
    }

    #[test]
    fn zero_minutes_disables_inactivity_policy() {
        let config = AuthConfig {
            inactivity_timeout_minutes: 0,
            ..Default::default()
        };
        assert_eq!(config.inactivity_timeout(), None);
    }

    #[test]
    fn missing_secret_fails() {
        assert!(AuthConfig::default()
            .validate(&Environment::Development)
            .is_err());
    }

    #[test]
    fn short_secret_allowed_only_outside_production() {
        let config = AuthConfig {
            jwt_secret: "local-dev-secret".to_string(),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::JwtSecretTooShort)
        );
    }

    #[test]
    fn short_admin_token_rejected_in_production() {
        let config = AuthConfig {
            jwt_secret: "x".repeat(40),
            admin_api_token: Some("short".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::AdminTokenTooShort)
        );
    }
}
