//! HTTP route handlers for the analytics API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                           - Liveness check
//! GET  /health/ready                     - Readiness check (pings the store)
//!
//! # Reports (all JSON, read-only)
//! GET  /getTotalSales?interval=…         - Sales totals per time bucket
//! GET  /getOverallSalesGrowthRate        - Year-over-year sales growth
//! GET  /getNewCustomers                  - Customer signups per day
//! GET  /getRepeatCustomers?interval=…    - Repeat purchasers per time bucket
//! GET  /getCustomerDistribution          - Customers per city
//! GET  /getCustomerLifetimeValueByCohort - Lifetime value per order cohort
//! ```

use axum::{Router, routing::get};

use crate::state::AppState;

pub mod analytics;
pub mod health;

/// Build the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/getTotalSales", get(analytics::total_sales))
        .route(
            "/getOverallSalesGrowthRate",
            get(analytics::overall_sales_growth_rate),
        )
        .route("/getNewCustomers", get(analytics::new_customers))
        .route("/getRepeatCustomers", get(analytics::repeat_customers))
        .route(
            "/getCustomerDistribution",
            get(analytics::customer_distribution),
        )
        .route(
            "/getCustomerLifetimeValueByCohort",
            get(analytics::customer_lifetime_value_by_cohort),
        )
}
