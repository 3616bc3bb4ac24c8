//! Geocoding value types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Coordinates resolved for a free-text address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
    /// Provider confidence normalized to `0.0..=1.0`.
    pub confidence: f64,
    /// Provider that produced the result.
    pub provider: String,
}

/// Why a single provider could not resolve an address.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    #[error("{provider}: credentials not configured")]
    MissingCredentials { provider: String },

    #[error("{provider}: no results for address")]
    NoResults { provider: String },

    #[error("{provider}: network error: {message}")]
    Network { provider: String, message: String },

    #[error("{provider}: provider error: {message}")]
    Provider { provider: String, message: String },

    #[error("address must not be blank")]
    EmptyAddress,

    /// Every configured provider failed; one entry per attempt, in order.
    #[error("all geocoding providers failed ({})", .attempts.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    AllProvidersFailed { attempts: Vec<GeocodeError> },
}

impl GeocodeError {
    pub fn missing_credentials(provider: impl Into<String>) -> Self {
        Self::MissingCredentials {
            provider: provider.into(),
        }
    }

    pub fn no_results(provider: impl Into<String>) -> Self {
        Self::NoResults {
            provider: provider.into(),
        }
    }

    pub fn network(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether the next provider in the chain should be tried.
    ///
    /// A blank address fails the same way everywhere, so it stops the chain.
    pub fn should_fall_back(&self) -> bool {
        !matches!(
            self,
            GeocodeError::EmptyAddress | GeocodeError::AllProvidersFailed { .. }
        )
    }
}

impl From<GeocodeError> for DomainError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::EmptyAddress => DomainError::validation("address", err.to_string()),
            other => DomainError::new(ErrorCode::GeocodingFailed, other.to_string()),
        }
    }
}
