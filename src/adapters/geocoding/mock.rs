//! Scripted geocoder for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;

use crate::domain::geocoding::{GeocodeError, GeocodeResult};
use crate::ports::Geocoder;

/// Answers from a per-address table, then a default, then `NoResults`.
#[derive(Debug)]
pub struct MockGeocoder {
    name: String,
    results: RwLock<HashMap<String, GeocodeResult>>,
    default: RwLock<Option<GeocodeResult>>,
    force_error: RwLock<Option<GeocodeError>>,
    calls: AtomicU32,
}

impl MockGeocoder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: RwLock::new(HashMap::new()),
            default: RwLock::new(None),
            force_error: RwLock::new(None),
            calls: AtomicU32::new(0),
        }
    }

    pub fn with_result(self, address: impl Into<String>, result: GeocodeResult) -> Self {
        self.results.write().unwrap().insert(address.into(), result);
        self
    }

    pub fn with_default(self, result: GeocodeResult) -> Self {
        *self.default.write().unwrap() = Some(result);
        self
    }

    pub fn with_error(self, error: GeocodeError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }
        if let Some(result) = self.results.read().unwrap().get(address) {
            return Ok(result.clone());
        }
        self.default
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| GeocodeError::no_results(self.name.clone()))
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
