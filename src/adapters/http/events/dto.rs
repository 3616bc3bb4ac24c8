//! Request and response DTOs for event endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::adapters::http::error::ApiError;
use crate::application::handlers::events::CreateEventResult;
use crate::domain::analytics::{AnalyticsQuery, Metric};
use crate::domain::event::{Event, EventStatus, EventType};
use crate::domain::foundation::EventId;
use crate::domain::scoring::Criterion;

/// Query string for `GET /api/events`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEventsParams {
    pub status: Option<EventStatus>,
    pub event_type: Option<EventType>,
    #[serde(default)]
    pub upcoming: bool,
    #[serde(default)]
    pub mine: bool,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateEventResponse {
    pub event: Event,
    pub geocoded: bool,
}

impl From<CreateEventResult> for CreateEventResponse {
    fn from(result: CreateEventResult) -> Self {
        Self {
            event: result.event,
            geocoded: result.geocoded,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultsParams {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateScoringSessionRequest {
    pub category: String,
    pub criteria: Vec<Criterion>,
}

/// Query string for analytics reports.
///
/// `metrics` is a comma-separated list; omitted means all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub metrics: Option<String>,
}

impl AnalyticsParams {
    pub fn into_query(self, event_id: Option<EventId>) -> Result<AnalyticsQuery, ApiError> {
        let metrics = match self.metrics.as_deref() {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(|m| m.parse::<Metric>().map_err(|e| ApiError::bad_param("metrics", e)))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(AnalyticsQuery::new(
            event_id,
            self.start_date,
            self.end_date,
            metrics,
        )?)
    }
}
