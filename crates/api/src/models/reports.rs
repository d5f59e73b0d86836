//! Aggregated report rows served by the analytics endpoints.
//!
//! Field names mirror the wire contract the dashboard already consumes:
//! grouped rows keep their bucket under `_id` and amounts use camelCase
//! keys. Monetary amounts are `Decimal` in process; they deserialize from
//! the string the aggregation pipeline projects (`$toString` over a
//! `$toDecimal` sum) and serialize to a JSON number for the dashboard's
//! charts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};

use shopsight_core::TimeBucket;

/// One time bucket of summed order totals, from `/getTotalSales`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalSalesRow {
    /// The bucket this row aggregates.
    #[serde(rename = "_id")]
    pub bucket: TimeBucket,
    /// Sum of order totals within the bucket.
    #[serde(
        rename = "totalSales",
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "rust_decimal::serde::str::deserialize"
    )]
    pub total_sales: Decimal,
}

/// One year of summed order totals; input to the growth-rate transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlySalesRow {
    /// Calendar year, the bare grouping key.
    #[serde(rename = "_id")]
    pub year: i32,
    /// Sum of order totals within the year.
    #[serde(
        rename = "totalSales",
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "rust_decimal::serde::str::deserialize"
    )]
    pub total_sales: Decimal,
}

/// Year-over-year growth of total sales, from `/getOverallSalesGrowthRate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthRateRow {
    pub year: i32,
    #[serde(rename = "growthRate")]
    pub growth_rate: GrowthRate,
}

/// Percentage change of a year's sales relative to the previous year.
///
/// The earliest year has no baseline and reports the number `0`; later
/// years report a two-decimal string (e.g. `"50.00"`), matching what the
/// dashboard parses. A previous-year total of exactly zero makes the rate
/// undefined, which serializes as `null` rather than fabricating a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrowthRate {
    /// First year in the series; nothing to compare against.
    Baseline,
    /// Percentage change from the previous year, rounded to two decimals.
    Percent(String),
    /// Previous year's total was zero; the rate is undefined.
    Undefined,
}

impl Serialize for GrowthRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Baseline => serializer.serialize_i32(0),
            Self::Percent(rate) => serializer.serialize_str(rate),
            Self::Undefined => serializer.serialize_none(),
        }
    }
}

/// Compute year-over-year growth rates from yearly totals.
///
/// `rows` must already be sorted ascending by year; the store returns them
/// that way.
#[must_use]
pub fn compute_growth_rates(rows: &[YearlySalesRow]) -> Vec<GrowthRateRow> {
    let mut out = Vec::with_capacity(rows.len());
    let mut previous: Option<Decimal> = None;
    for row in rows {
        let growth_rate = match previous {
            None => GrowthRate::Baseline,
            Some(prev) if prev.is_zero() => GrowthRate::Undefined,
            Some(prev) => {
                let percent = (row.total_sales - prev) / prev * Decimal::ONE_HUNDRED;
                let rounded =
                    percent.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                GrowthRate::Percent(format!("{rounded:.2}"))
            }
        };
        out.push(GrowthRateRow {
            year: row.year,
            growth_rate,
        });
        previous = Some(row.total_sales);
    }
    out
}

/// One daily bucket of customer signups, from `/getNewCustomers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomersRow {
    #[serde(rename = "_id")]
    pub bucket: TimeBucket,
    /// Customers created within the bucket.
    pub count: u64,
}

/// One time bucket of repeat purchasers, from `/getRepeatCustomers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatCustomersRow {
    #[serde(rename = "_id")]
    pub bucket: TimeBucket,
    /// Customers with more than one order within the bucket.
    #[serde(rename = "repeatCustomers")]
    pub repeat_customers: u64,
}

/// One city of customers, from `/getCustomerDistribution`.
///
/// Customers without a city group under a single `null` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRow {
    #[serde(rename = "_id")]
    pub city: Option<String>,
    pub count: u64,
}

/// Grouping key for a lifetime-value cohort: the order's month and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CohortKey {
    /// Month of the orders defining the cohort, 1-12.
    pub cohort: u32,
    pub year: i32,
}

/// One cohort of customer lifetime value, from
/// `/getCustomerLifetimeValueByCohort`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortRow {
    #[serde(rename = "_id")]
    pub cohort: CohortKey,
    /// Sum of order totals across every order joined into the cohort.
    #[serde(
        rename = "lifetimeValue",
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "rust_decimal::serde::str::deserialize"
    )]
    pub lifetime_value: Decimal,
    /// Distinct customers whose orders fall in the cohort.
    #[serde(rename = "customerCount")]
    pub customer_count: u64,
}
