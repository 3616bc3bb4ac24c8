//! Geocoding adapters implementing the `Geocoder` port.
//!
//! - `GoogleGeocoder` - primary, requires an API key
//! - `NominatimGeocoder` - keyless secondary
//! - `FallbackGeocoder` - chains the two and geocodes batches
//! - `MockGeocoder` - scripted test double

mod fallback;
mod google;
mod mock;
mod nominatim;

pub use fallback::FallbackGeocoder;
pub use google::{GoogleGeocoder, GoogleGeocoderConfig};
pub use mock::MockGeocoder;
pub use nominatim::{NominatimConfig, NominatimGeocoder};
