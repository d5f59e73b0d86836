//! Record store access for the analytics reports.
//!
//! The store is a trait seam so handlers can run against either the real
//! MongoDB deployment ([`MongoStore`]) or an in-process reference
//! implementation ([`MemoryStore`]) in tests. Every method corresponds to
//! one report and runs exactly one aggregation per call; the pure pipeline
//! definitions live in [`pipelines`].

use async_trait::async_trait;
use thiserror::Error;

use shopsight_core::Granularity;

use crate::models::reports::{
    CohortRow, DistributionRow, NewCustomersRow, RepeatCustomersRow, TotalSalesRow, YearlySalesRow,
};

pub mod memory;
pub mod mongo;
pub mod pipelines;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Errors from building or running a report query.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The MongoDB driver reported a failure.
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),

    /// An aggregation returned a row that does not match the report shape.
    #[error("malformed aggregation row: {0}")]
    MalformedRow(#[from] mongodb::bson::de::Error),

    /// Neither `MONGODB_DATABASE` nor the connection string names a database.
    #[error("no database selected: set MONGODB_DATABASE or name one in MONGODB_URI")]
    MissingDatabase,

    /// A stored `total_price` string is not a decimal amount.
    #[error("unparseable stored amount {amount:?}: {source}")]
    BadAmount {
        amount: String,
        source: rust_decimal::Error,
    },

    /// The store cannot be reached.
    #[error("{0}")]
    Unavailable(String),
}

/// Read-only aggregation queries over the order and customer collections.
///
/// One method per report. Implementations must return rows already sorted
/// the way the report serves them.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Check connectivity. Used at startup and by the readiness probe.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release any resources held by the store. Called once at shutdown.
    async fn close(&self) {}

    /// Order totals summed per time bucket, sorted ascending by
    /// year/month/day.
    async fn total_sales(&self, granularity: Granularity)
    -> Result<Vec<TotalSalesRow>, StoreError>;

    /// Order totals summed per year, sorted ascending by year.
    async fn yearly_sales(&self) -> Result<Vec<YearlySalesRow>, StoreError>;

    /// Customers created per day, sorted ascending by year/month/day.
    async fn new_customers(&self) -> Result<Vec<NewCustomersRow>, StoreError>;

    /// Customers with more than one order per time bucket, sorted ascending
    /// by year/month/day/quarter.
    async fn repeat_customers(
        &self,
        granularity: Granularity,
    ) -> Result<Vec<RepeatCustomersRow>, StoreError>;

    /// Customers counted per default-address city, sorted descending by
    /// count.
    async fn customer_distribution(&self) -> Result<Vec<DistributionRow>, StoreError>;

    /// Lifetime value and distinct-customer count per order-month cohort,
    /// sorted ascending by year then cohort month. Customers without orders
    /// join no cohort.
    async fn lifetime_value_by_cohort(&self) -> Result<Vec<CohortRow>, StoreError>;
}
