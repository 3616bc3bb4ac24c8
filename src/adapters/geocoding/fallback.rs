//! Primary/secondary geocoder chain.
//!
//! ```ignore
//! let geocoder = FallbackGeocoder::new(Arc::new(google))
//!     .with_secondary(Arc::new(nominatim))
//!     .with_batch_delay(Duration::from_millis(1100));
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::geocoding::{GeocodeError, GeocodeResult};
use crate::ports::Geocoder;

/// Tries the primary provider, then the secondary on any provider-side failure.
///
/// Sequential and without retries. When every provider fails the error is
/// `AllProvidersFailed` with one entry per attempt.
pub struct FallbackGeocoder {
    primary: Arc<dyn Geocoder>,
    secondary: Option<Arc<dyn Geocoder>>,
    batch_delay: Duration,
}

impl FallbackGeocoder {
    pub fn new(primary: Arc<dyn Geocoder>) -> Self {
        Self {
            primary,
            secondary: None,
            batch_delay: Duration::ZERO,
        }
    }

    pub fn with_secondary(mut self, secondary: Arc<dyn Geocoder>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Pause between consecutive items of `geocode_batch`.
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }
}

#[async_trait]
impl Geocoder for FallbackGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let primary_err = match self.primary.geocode(address).await {
            Ok(result) => return Ok(result),
            Err(err) if !err.should_fall_back() => return Err(err),
            Err(err) => err,
        };

        let Some(secondary) = &self.secondary else {
            return Err(GeocodeError::AllProvidersFailed {
                attempts: vec![primary_err],
            });
        };

        tracing::info!(
            primary = self.primary.provider_name(),
            secondary = secondary.provider_name(),
            reason = %primary_err,
            "Geocoding falling back to secondary provider"
        );

        match secondary.geocode(address).await {
            Ok(result) => Ok(result),
            Err(secondary_err) => {
                tracing::warn!(
                    primary_error = %primary_err,
                    secondary_error = %secondary_err,
                    "All geocoding providers failed"
                );
                Err(GeocodeError::AllProvidersFailed {
                    attempts: vec![primary_err, secondary_err],
                })
            }
        }
    }

    fn provider_name(&self) -> &str {
        self.primary.provider_name()
    }

    /// Pauses `batch_delay` between consecutive items.
    async fn geocode_batch(
        &self,
        addresses: &[String],
    ) -> Vec<Result<GeocodeResult, GeocodeError>> {
        let mut results = Vec::with_capacity(addresses.len());
        for (index, address) in addresses.iter().enumerate() {
            if index > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
            results.push(self.geocode(address).await);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::geocoding::MockGeocoder;

    fn hit(provider: &str, lat: f64) -> GeocodeResult {
        GeocodeResult {
            latitude: lat,
            longitude: -97.0,
            formatted_address: "Austin, TX".into(),
            confidence: 0.9,
            provider: provider.into(),
        }
    }

    #[tokio::test]
    async fn primary_success_skips_secondary() {
        let secondary = Arc::new(MockGeocoder::new("nominatim").with_default(hit("nominatim", 2.0)));
        let geocoder = FallbackGeocoder::new(Arc::new(
            MockGeocoder::new("google").with_default(hit("google", 1.0)),
        ))
        .with_secondary(secondary.clone());

        let result = geocoder.geocode("Austin").await.unwrap();
        assert_eq!(result.provider, "google");
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn secondary_coordinates_are_returned_after_primary_failure() {
        let geocoder = FallbackGeocoder::new(Arc::new(
            MockGeocoder::new("google").with_error(GeocodeError::no_results("google")),
        ))
        .with_secondary(Arc::new(
            MockGeocoder::new("nominatim").with_default(hit("nominatim", 30.27)),
        ));

        let result = geocoder.geocode("Austin").await.unwrap();
        assert_eq!(result.provider, "nominatim");
        assert_eq!(result.latitude, 30.27);
    }

    #[tokio::test]
    async fn both_failures_are_listed_in_order() {
        let geocoder = FallbackGeocoder::new(Arc::new(
            MockGeocoder::new("google").with_error(GeocodeError::missing_credentials("google")),
        ))
        .with_secondary(Arc::new(
            MockGeocoder::new("nominatim").with_error(GeocodeError::network("nominatim", "timeout")),
        ));

        let err = geocoder.geocode("Austin").await.unwrap_err();
        assert_eq!(
            err,
            GeocodeError::AllProvidersFailed {
                attempts: vec![
                    GeocodeError::missing_credentials("google"),
                    GeocodeError::network("nominatim", "timeout"),
                ]
            }
        );
    }

    #[tokio::test]
    async fn blank_address_never_reaches_providers() {
        let primary = Arc::new(MockGeocoder::new("google"));
        let geocoder = FallbackGeocoder::new(primary.clone());
        assert_eq!(
            geocoder.geocode("   ").await.unwrap_err(),
            GeocodeError::EmptyAddress
        );
        assert_eq!(primary.call_count(), 0);
    }

    #[tokio::test]
    async fn batch_keeps_input_order() {
        let geocoder = FallbackGeocoder::new(Arc::new(
            MockGeocoder::new("google")
                .with_result("a", hit("google", 1.0))
                .with_result("c", hit("google", 3.0)),
        ));
        let results = geocoder
            .geocode_batch(&["a".to_string(), "b".to_string(), "c".to_string()])
            .await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().latitude, 1.0);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().latitude, 3.0);
    }
}
