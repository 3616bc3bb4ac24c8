//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Converts Unix seconds, as sent in provider webhooks. Out-of-range input
    /// yields `None`.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Midnight UTC at the start of `date`.
    pub fn start_of(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    /// Last representable second of `date` in UTC.
    pub fn end_of(date: NaiveDate) -> Self {
        Self::start_of(date).plus(Duration::days(1) - Duration::seconds(1))
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Negative when `other` is later than `self`.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    pub fn plus(&self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }

    pub fn minus(&self, duration: Duration) -> Self {
        Self(self.0 - duration)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_between_surrounding_clock_reads() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();
        assert!(ts.as_datetime() >= &before && ts.as_datetime() <= &after);
    }

    #[test]
    fn unix_seconds_round_trip_through_chrono() {
        let ts = Timestamp::from_unix_secs(1_704_067_200).unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn day_bounds_cover_the_whole_date() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 13).unwrap();
        let start = Timestamp::start_of(date);
        let end = Timestamp::end_of(date);
        assert_eq!(start.date(), date);
        assert_eq!(end.date(), date);
        assert_eq!(end.duration_since(&start), Duration::seconds(86_399));
    }

    #[test]
    fn ordering_helpers_agree_with_ord() {
        let earlier = Timestamp::now();
        let later = earlier.plus(Duration::minutes(5));
        assert!(earlier.is_before(&later));
        assert!(later.is_after(&earlier));
        assert!(earlier < later);
        assert_eq!(later.minus(Duration::minutes(5)), earlier);
    }
}
