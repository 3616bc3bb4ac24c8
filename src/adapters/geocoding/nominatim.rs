//! OpenStreetMap Nominatim adapter (secondary provider, keyless).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::geocoding::{GeocodeError, GeocodeResult};
use crate::ports::Geocoder;

const PROVIDER: &str = "nominatim";

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Sent on every request; the public instance rejects anonymous clients.
    pub user_agent: String,
    pub timeout: Duration,
}

impl NominatimConfig {
    pub fn new(base_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: user_agent.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct NominatimGeocoder {
    config: NominatimConfig,
    client: Client,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_default();
        Self { config, client }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    importance: Option<f64>,
}

fn interpret(places: Vec<Place>) -> Result<GeocodeResult, GeocodeError> {
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::no_results(PROVIDER))?;

    let latitude: f64 = place
        .lat
        .parse()
        .map_err(|_| GeocodeError::provider(PROVIDER, format!("bad latitude {}", place.lat)))?;
    let longitude: f64 = place
        .lon
        .parse()
        .map_err(|_| GeocodeError::provider(PROVIDER, format!("bad longitude {}", place.lon)))?;

    Ok(GeocodeResult {
        latitude,
        longitude,
        formatted_address: place.display_name,
        confidence: place.importance.unwrap_or(0.5).clamp(0.0, 1.0),
        provider: PROVIDER.to_string(),
    })
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::network(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::provider(
                PROVIDER,
                format!("HTTP {}", response.status()),
            ));
        }

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| GeocodeError::provider(PROVIDER, format!("invalid response: {}", e)))?;

        interpret(places)
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
