//! Analytics report handlers.
//!
//! Each handler parses its query parameters, runs one aggregation through
//! the record store, and serializes the rows as JSON. Store failures
//! convert to 500 responses through [`AppError`]; a bad or missing
//! `interval` converts to 400.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use shopsight_core::Granularity;

use crate::error::{AppError, Result};
use crate::models::reports::{
    CohortRow, DistributionRow, GrowthRateRow, NewCustomersRow, RepeatCustomersRow, TotalSalesRow,
    compute_growth_rates,
};
use crate::state::AppState;

/// Query parameters for the bucketed reports.
#[derive(Debug, Deserialize)]
pub struct IntervalQuery {
    /// Bucketing granularity: "daily", "monthly", "quarterly", or "yearly".
    pub interval: Option<String>,
}

impl IntervalQuery {
    /// Parse the interval. Missing counts the same as unrecognized.
    fn granularity(&self) -> Result<Granularity> {
        self.interval
            .as_deref()
            .and_then(|interval| Granularity::parse(interval).ok())
            .ok_or(AppError::InvalidInterval)
    }
}

/// `GET /getTotalSales?interval=…` - order totals per time bucket.
pub async fn total_sales(
    State(state): State<AppState>,
    Query(query): Query<IntervalQuery>,
) -> Result<Json<Vec<TotalSalesRow>>> {
    let granularity = query.granularity()?;
    Ok(Json(state.store().total_sales(granularity).await?))
}

/// `GET /getOverallSalesGrowthRate` - year-over-year growth of total sales.
pub async fn overall_sales_growth_rate(
    State(state): State<AppState>,
) -> Result<Json<Vec<GrowthRateRow>>> {
    let yearly = state.store().yearly_sales().await?;
    Ok(Json(compute_growth_rates(&yearly)))
}

/// `GET /getNewCustomers` - customer signups per day.
pub async fn new_customers(State(state): State<AppState>) -> Result<Json<Vec<NewCustomersRow>>> {
    Ok(Json(state.store().new_customers().await?))
}

/// `GET /getRepeatCustomers?interval=…` - repeat purchasers per time bucket.
pub async fn repeat_customers(
    State(state): State<AppState>,
    Query(query): Query<IntervalQuery>,
) -> Result<Json<Vec<RepeatCustomersRow>>> {
    let granularity = query.granularity()?;
    Ok(Json(state.store().repeat_customers(granularity).await?))
}

/// `GET /getCustomerDistribution` - customers per default-address city.
pub async fn customer_distribution(
    State(state): State<AppState>,
) -> Result<Json<Vec<DistributionRow>>> {
    Ok(Json(state.store().customer_distribution().await?))
}

/// `GET /getCustomerLifetimeValueByCohort` - lifetime value per order-month
/// cohort.
pub async fn customer_lifetime_value_by_cohort(
    State(state): State<AppState>,
) -> Result<Json<Vec<CohortRow>>> {
    Ok(Json(state.store().lifetime_value_by_cohort().await?))
}
