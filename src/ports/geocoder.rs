//! Geocoder port for resolving street addresses to coordinates.

use async_trait::async_trait;

use crate::domain::geocoding::{GeocodeError, GeocodeResult};

/// One geocoding provider, or a chain of them.
///
/// Implementations make a single attempt per call. Fallback between providers
/// is the job of the composing adapter.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError>;

    /// Short provider name used in logs and error messages.
    fn provider_name(&self) -> &str;

    /// Geocodes each address in order, one result per input.
    ///
    /// The default runs the lookups back to back. Chains that talk to rate
    /// limited providers override it to pause between items.
    async fn geocode_batch(
        &self,
        addresses: &[String],
    ) -> Vec<Result<GeocodeResult, GeocodeError>> {
        let mut results = Vec::with_capacity(addresses.len());
        for address in addresses {
            results.push(self.geocode(address).await);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocoder_is_object_safe() {
        fn _accepts_dyn(_geocoder: &dyn Geocoder) {}
    }
}
