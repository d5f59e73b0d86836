//! Reporting granularity parsed from the `interval` query parameter.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Granularity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GranularityError {
    /// The input is not one of the recognized interval names.
    #[error("unrecognized interval {0:?} (expected daily, monthly, quarterly, or yearly)")]
    Unrecognized(String),
}

/// A calendar part that a [`Granularity`] decomposes timestamps into.
///
/// Aggregation results are keyed by the set of parts for their granularity,
/// using [`TimePart::field`] as the key name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePart {
    /// Day of the month, 1-31.
    Day,
    /// Month of the year, 1-12.
    Month,
    /// Quarter of the year, 1-4.
    Quarter,
    /// Calendar year.
    Year,
}

impl TimePart {
    /// Returns the key name this part uses in bucket keys.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for TimePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field())
    }
}

/// How finely a report buckets its results in time.
///
/// Parsed from the `interval` query parameter. Matching is exact and
/// case-sensitive: `"daily"`, `"monthly"`, `"quarterly"`, or `"yearly"`.
/// Anything else - including case variants like `"Daily"` - is rejected.
///
/// ## Examples
///
/// ```
/// use shopsight_core::Granularity;
///
/// assert_eq!(Granularity::parse("monthly"), Ok(Granularity::Monthly));
/// assert!(Granularity::parse("Monthly").is_err());
/// assert!(Granularity::parse("weekly").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar day.
    Daily,
    /// One bucket per calendar month.
    Monthly,
    /// One bucket per calendar quarter.
    Quarterly,
    /// One bucket per calendar year.
    Yearly,
}

impl Granularity {
    /// All granularities, finest first.
    pub const ALL: [Self; 4] = [Self::Daily, Self::Monthly, Self::Quarterly, Self::Yearly];

    /// Parse a `Granularity` from an `interval` query value.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly one of `daily`,
    /// `monthly`, `quarterly`, or `yearly`.
    pub fn parse(s: &str) -> Result<Self, GranularityError> {
        match s {
            "daily" => Ok(Self::Daily),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            other => Err(GranularityError::Unrecognized(other.to_owned())),
        }
    }

    /// Returns the interval name as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Returns the calendar parts this granularity buckets timestamps into.
    ///
    /// Every granularity includes [`TimePart::Year`]; finer granularities
    /// add the parts needed to tell their buckets apart within a year.
    #[must_use]
    pub const fn parts(self) -> &'static [TimePart] {
        match self {
            Self::Daily => &[TimePart::Day, TimePart::Month, TimePart::Year],
            Self::Monthly => &[TimePart::Month, TimePart::Year],
            Self::Quarterly => &[TimePart::Quarter, TimePart::Year],
            Self::Yearly => &[TimePart::Year],
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = GranularityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
