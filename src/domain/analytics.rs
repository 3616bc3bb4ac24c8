//! Event analytics: registration, revenue and attendance figures.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{str_enum, EventId, Timestamp, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Registrations,
    Revenue,
    Attendance,
}

str_enum!(Metric {
    Registrations => "registrations",
    Revenue => "revenue",
    Attendance => "attendance",
});

/// Filters for an analytics report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsQuery {
    /// `None` reports across all events.
    pub event_id: Option<EventId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub metrics: Vec<Metric>,
}

impl AnalyticsQuery {
    /// Builds a query; an empty metric list means every metric.
    pub fn new(
        event_id: Option<EventId>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        metrics: Vec<Metric>,
    ) -> Result<Self, ValidationError> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(ValidationError::invalid_format(
                    "end_date",
                    "must be on or after start_date",
                ));
            }
        }
        let mut metrics = if metrics.is_empty() {
            Metric::ALL.to_vec()
        } else {
            metrics
        };
        metrics.sort();
        metrics.dedup();
        Ok(Self {
            event_id,
            start_date,
            end_date,
            metrics,
        })
    }

    pub fn includes(&self, metric: Metric) -> bool {
        self.metrics.contains(&metric)
    }

    /// Inclusive timestamp bounds covering whole days.
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            from: self.start_date.map(Timestamp::start_of),
            to: self.end_date.map(Timestamp::end_of),
        }
    }
}

/// Inclusive bounds; `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

impl TimeWindow {
    pub fn contains(&self, at: Timestamp) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistrationStats {
    pub total: u64,
    pub by_category: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RevenueStats {
    /// Collected amount net of refunds, summed across currencies.
    pub total_cents: i64,
    pub transaction_count: u64,
    pub by_currency: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttendanceStats {
    pub check_ins: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAnalytics {
    pub event_id: Option<EventId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrations: Option<RegistrationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<RevenueStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<AttendanceStats>,
    pub generated_at: Timestamp,
}

impl EventAnalytics {
    pub fn empty(query: &AnalyticsQuery) -> Self {
        Self {
            event_id: query.event_id,
            start_date: query.start_date,
            end_date: query.end_date,
            registrations: None,
            revenue: None,
            attendance: None,
            generated_at: Timestamp::now(),
        }
    }
}
