//! Weighted judging rubric.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Upper bound on a single criterion weight.
pub const MAX_CRITERION_WEIGHT: f64 = 1000.0;

/// One judged criterion, e.g. "install quality" worth up to 10 points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    /// Relative weight in `(0, MAX_CRITERION_WEIGHT]`.
    pub weight: f64,
    pub max_points: u32,
}

/// Ordered set of criteria with unique names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rubric(Vec<Criterion>);

impl Rubric {
    pub fn new(criteria: Vec<Criterion>) -> Result<Self, ValidationError> {
        if criteria.is_empty() {
            return Err(ValidationError::empty_field("rubric"));
        }
        let mut seen = HashSet::new();
        for criterion in &criteria {
            let name = criterion.name.trim();
            if name.is_empty() {
                return Err(ValidationError::empty_field("rubric.name"));
            }
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(ValidationError::invalid_format(
                    "rubric.name",
                    format!("duplicate criterion '{}'", name),
                ));
            }
            if !criterion.weight.is_finite()
                || criterion.weight <= 0.0
                || criterion.weight > MAX_CRITERION_WEIGHT
            {
                return Err(ValidationError::invalid_format(
                    "rubric.weight",
                    format!(
                        "weight for '{}' must be above 0 and at most {}",
                        name, MAX_CRITERION_WEIGHT
                    ),
                ));
            }
            if criterion.max_points == 0 {
                return Err(ValidationError::out_of_range(
                    "rubric.max_points",
                    1,
                    u32::MAX as i64,
                    0,
                ));
            }
        }
        Ok(Self(criteria))
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.0
    }

    pub fn total_weight(&self) -> f64 {
        self.0.iter().map(|c| c.weight).sum()
    }

    /// Checks a judge's sheet and returns its weighted mean.
    ///
    /// Every criterion must be scored exactly once, within `0..=max_points`.
    /// Names are matched case-sensitively.
    pub fn weighted_total(&self, points: &BTreeMap<String, f64>) -> Result<f64, ValidationError> {
        if let Some(unknown) = points
            .keys()
            .find(|name| !self.0.iter().any(|c| &c.name == *name))
        {
            return Err(ValidationError::invalid_format(
                "points",
                format!("unknown criterion '{}'", unknown),
            ));
        }

        let mut weighted = 0.0;
        for criterion in &self.0 {
            let value = *points.get(&criterion.name).ok_or_else(|| {
                ValidationError::empty_field(format!("points.{}", criterion.name))
            })?;
            if !value.is_finite() || value < 0.0 || value > criterion.max_points as f64 {
                return Err(ValidationError::invalid_format(
                    format!("points.{}", criterion.name),
                    format!("must be between 0 and {}", criterion.max_points),
                ));
            }
            weighted += value * criterion.weight;
        }
        Ok(weighted / self.total_weight())
    }
}
