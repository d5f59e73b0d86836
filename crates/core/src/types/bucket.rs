//! Time bucket keys for aggregated report rows.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::granularity::Granularity;

/// The calendar bucket an aggregated row belongs to.
///
/// Only the parts for the row's granularity are present; the rest are `None`
/// and omitted from serialized output. A daily bucket serializes as
/// `{"day":5,"month":1,"year":2023}`, a quarterly one as
/// `{"quarter":1,"year":2023}`.
///
/// ## Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use shopsight_core::{Granularity, TimeBucket};
///
/// let at = Utc.with_ymd_and_hms(2023, 8, 5, 12, 0, 0).unwrap();
/// assert_eq!(
///     TimeBucket::from_datetime(Granularity::Quarterly, at),
///     TimeBucket::quarterly(3, 2023),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeBucket {
    /// Day of the month, for daily buckets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    /// Month of the year, for daily and monthly buckets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    /// Quarter of the year, for quarterly buckets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u32>,
    /// Calendar year. Present in every bucket.
    pub year: i32,
}

impl TimeBucket {
    /// Create a daily bucket.
    #[must_use]
    pub const fn daily(day: u32, month: u32, year: i32) -> Self {
        Self {
            day: Some(day),
            month: Some(month),
            quarter: None,
            year,
        }
    }

    /// Create a monthly bucket.
    #[must_use]
    pub const fn monthly(month: u32, year: i32) -> Self {
        Self {
            day: None,
            month: Some(month),
            quarter: None,
            year,
        }
    }

    /// Create a quarterly bucket.
    #[must_use]
    pub const fn quarterly(quarter: u32, year: i32) -> Self {
        Self {
            day: None,
            month: None,
            quarter: Some(quarter),
            year,
        }
    }

    /// Create a yearly bucket.
    #[must_use]
    pub const fn yearly(year: i32) -> Self {
        Self {
            day: None,
            month: None,
            quarter: None,
            year,
        }
    }

    /// Bucket the given instant at the given granularity.
    ///
    /// The quarter is derived from the month: months 1-3 fall in quarter 1,
    /// 4-6 in quarter 2, and so on.
    #[must_use]
    pub fn from_datetime(granularity: Granularity, at: DateTime<Utc>) -> Self {
        match granularity {
            Granularity::Daily => Self::daily(at.day(), at.month(), at.year()),
            Granularity::Monthly => Self::monthly(at.month(), at.year()),
            Granularity::Quarterly => Self::quarterly(at.month().div_ceil(3), at.year()),
            Granularity::Yearly => Self::yearly(at.year()),
        }
    }

    /// Key for ordering buckets the way reports sort them: year first, then
    /// month, day, and quarter, with absent parts ordered before present
    /// ones.
    #[must_use]
    pub fn sort_key(self) -> (i32, u32, u32, u32) {
        (
            self.year,
            self.month.unwrap_or(0),
            self.day.unwrap_or(0),
            self.quarter.unwrap_or(0),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_from_datetime_daily() {
        assert_eq!(
            TimeBucket::from_datetime(Granularity::Daily, at(2023, 1, 5)),
            TimeBucket::daily(5, 1, 2023)
        );
    }

    #[test]
    fn test_from_datetime_monthly() {
        assert_eq!(
            TimeBucket::from_datetime(Granularity::Monthly, at(2023, 12, 31)),
            TimeBucket::monthly(12, 2023)
        );
    }

    #[test]
    fn test_from_datetime_yearly() {
        assert_eq!(
            TimeBucket::from_datetime(Granularity::Yearly, at(2021, 6, 15)),
            TimeBucket::yearly(2021)
        );
    }

    #[test]
    fn test_quarter_boundaries() {
        let cases = [
            (1, 1),
            (3, 1),
            (4, 2),
            (6, 2),
            (7, 3),
            (9, 3),
            (10, 4),
            (12, 4),
        ];
        for (month, quarter) in cases {
            assert_eq!(
                TimeBucket::from_datetime(Granularity::Quarterly, at(2023, month, 1)),
                TimeBucket::quarterly(quarter, 2023),
                "month {month} should fall in quarter {quarter}"
            );
        }
    }

    #[test]
    fn test_serialize_omits_absent_parts() {
        let daily = serde_json::to_string(&TimeBucket::daily(5, 1, 2023)).unwrap();
        assert_eq!(daily, r#"{"day":5,"month":1,"year":2023}"#);

        let monthly = serde_json::to_string(&TimeBucket::monthly(1, 2023)).unwrap();
        assert_eq!(monthly, r#"{"month":1,"year":2023}"#);

        let quarterly = serde_json::to_string(&TimeBucket::quarterly(1, 2023)).unwrap();
        assert_eq!(quarterly, r#"{"quarter":1,"year":2023}"#);

        let yearly = serde_json::to_string(&TimeBucket::yearly(2023)).unwrap();
        assert_eq!(yearly, r#"{"year":2023}"#);
    }

    #[test]
    fn test_deserialize_missing_parts_as_none() {
        let bucket: TimeBucket = serde_json::from_str(r#"{"quarter":2,"year":2022}"#).unwrap();
        assert_eq!(bucket, TimeBucket::quarterly(2, 2022));
        assert_eq!(bucket.day, None);
        assert_eq!(bucket.month, None);
    }

    #[test]
    fn test_sort_key_orders_chronologically() {
        let mut buckets = vec![
            TimeBucket::daily(2, 1, 2023),
            TimeBucket::daily(31, 12, 2022),
            TimeBucket::daily(1, 1, 2023),
        ];
        buckets.sort_by_key(|bucket| bucket.sort_key());
        assert_eq!(
            buckets,
            vec![
                TimeBucket::daily(31, 12, 2022),
                TimeBucket::daily(1, 1, 2023),
                TimeBucket::daily(2, 1, 2023),
            ]
        );
    }

    #[test]
    fn test_sort_key_orders_quarters_within_year() {
        let mut buckets = vec![
            TimeBucket::quarterly(3, 2023),
            TimeBucket::quarterly(1, 2023),
            TimeBucket::quarterly(4, 2022),
        ];
        buckets.sort_by_key(|bucket| bucket.sort_key());
        assert_eq!(
            buckets,
            vec![
                TimeBucket::quarterly(4, 2022),
                TimeBucket::quarterly(1, 2023),
                TimeBucket::quarterly(3, 2023),
            ]
        );
    }
}
