//! Monetary amounts in minor units.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Non-negative amount in cents with a lowercase ISO-4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    cents: i64,
    currency: String,
}

impl Money {
    pub fn new(cents: i64, currency: impl Into<String>) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::out_of_range("amount", 0, i64::MAX, cents));
        }
        let currency = currency.into().to_ascii_lowercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "expected a three-letter ISO-4217 code",
            ));
        }
        Ok(Self { cents, currency })
    }

    pub fn zero(currency: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(0, currency)
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Difference, or `None` when currencies differ or the result would be negative.
    pub fn checked_sub(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency || other.cents > self.cents {
            return None;
        }
        Some(Money {
            cents: self.cents - other.cents,
            currency: self.currency.clone(),
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.cents / 100,
            self.cents % 100,
            self.currency.to_ascii_uppercase()
        )
    }
}
