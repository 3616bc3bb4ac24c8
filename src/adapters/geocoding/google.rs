//! Google Geocoding API adapter (primary provider).

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::geocoding::{GeocodeError, GeocodeResult};
use crate::ports::Geocoder;

const PROVIDER: &str = "google";

#[derive(Clone)]
pub struct GoogleGeocoderConfig {
    api_key: Option<SecretString>,
    base_url: String,
    timeout: Duration,
}

impl GoogleGeocoderConfig {
    /// A `None` key is accepted; every lookup then fails with missing credentials.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()).map(SecretString::new),
            base_url: "https://maps.googleapis.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct GoogleGeocoder {
    config: GoogleGeocoderConfig,
    client: Client,
}

impl GoogleGeocoder {
    pub fn new(config: GoogleGeocoderConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    fn geocode_url(&self) -> String {
        format!(
            "{}/maps/api/geocode/json",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleResult {
    formatted_address: String,
    geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
struct GoogleGeometry {
    location: GoogleLocation,
    #[serde(default)]
    location_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleLocation {
    lat: f64,
    lng: f64,
}

/// Maps Google's `location_type` precision onto `0.0..=1.0`.
fn confidence_for(location_type: Option<&str>) -> f64 {
    match location_type {
        Some("ROOFTOP") => 1.0,
        Some("RANGE_INTERPOLATED") => 0.8,
        Some("GEOMETRIC_CENTER") => 0.6,
        _ => 0.4,
    }
}

fn interpret(response: GoogleResponse) -> Result<GeocodeResult, GeocodeError> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Err(GeocodeError::no_results(PROVIDER)),
        "REQUEST_DENIED" if response.error_message.is_none() => {
            return Err(GeocodeError::missing_credentials(PROVIDER))
        }
        status => {
            let message = match response.error_message {
                Some(detail) => format!("{}: {}", status, detail),
                None => status.to_string(),
            };
            return Err(GeocodeError::provider(PROVIDER, message));
        }
    }

    let first = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::no_results(PROVIDER))?;

    Ok(GeocodeResult {
        latitude: first.geometry.location.lat,
        longitude: first.geometry.location.lng,
        confidence: confidence_for(first.geometry.location_type.as_deref()),
        formatted_address: first.formatted_address,
        provider: PROVIDER.to_string(),
    })
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| GeocodeError::missing_credentials(PROVIDER))?;

        let response = self
            .client
            .get(self.geocode_url())
            .query(&[("address", address), ("key", api_key.expose_secret().as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::network(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::provider(
                PROVIDER,
                format!("HTTP {}", response.status()),
            ));
        }

        let body: GoogleResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::provider(PROVIDER, format!("invalid response: {}", e)))?;

        interpret(body)
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
