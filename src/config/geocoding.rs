//! Geocoding configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Geocoding providers: Google (primary, needs a key) then Nominatim (keyless).
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingConfig {
    /// Google Geocoding API key. Without it the primary reports missing credentials
    /// and every lookup falls through to Nominatim.
    pub google_api_key: Option<String>,

    #[serde(default = "default_google_base_url")]
    pub google_base_url: String,

    #[serde(default = "default_nominatim_base_url")]
    pub nominatim_base_url: String,

    /// Nominatim usage policy requires an identifying User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Fixed pause between items of a batch
    #[serde(default = "default_batch_delay")]
    pub batch_delay_ms: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl GeocodingConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for url in [&self.google_base_url, &self.nominatim_base_url] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ValidationError::InvalidGeocodingUrl);
            }
        }
        if self.user_agent.trim().is_empty() {
            return Err(ValidationError::MissingRequired("GEOCODING__USER_AGENT"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            google_base_url: default_google_base_url(),
            nominatim_base_url: default_nominatim_base_url(),
            user_agent: default_user_agent(),
            batch_delay_ms: default_batch_delay(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_google_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

fn default_nominatim_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    "car-audio-events/0.1 (support@caraudioevents.com)".to_string()
}

fn default_batch_delay() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_without_google_key() {
        let config = GeocodingConfig::default();
        assert!(config.google_api_key.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let config = GeocodingConfig {
            nominatim_base_url: "ftp://osm.example".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidGeocodingUrl));
    }

    #[test]
    fn blank_user_agent_is_rejected() {
        let config = GeocodingConfig {
            user_agent: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
