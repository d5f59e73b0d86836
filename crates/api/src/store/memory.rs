//! In-memory record store.
//!
//! Reference implementation of [`AnalyticsStore`] over plain vectors,
//! computing the same grouping semantics as the MongoDB pipelines. Handler
//! tests run against it; it also documents what each pipeline means without
//! reading aggregation syntax.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use chrono::Datelike;
use rust_decimal::Decimal;

use async_trait::async_trait;
use shopsight_core::{Granularity, TimeBucket};

use crate::models::records::{Customer, Order};
use crate::models::reports::{
    CohortKey, CohortRow, DistributionRow, NewCustomersRow, RepeatCustomersRow, TotalSalesRow,
    YearlySalesRow,
};

use super::{AnalyticsStore, StoreError};

/// Record store over in-memory customer and order vectors.
///
/// An injected failure message makes every method return
/// [`StoreError::Unavailable`], for exercising the 500 path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    customers: Vec<Customer>,
    orders: Vec<Order>,
    failure: Mutex<Option<String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_customers(mut self, customers: Vec<Customer>) -> Self {
        self.customers = customers;
        self
    }

    #[must_use]
    pub fn with_orders(mut self, orders: Vec<Order>) -> Self {
        self.orders = orders;
        self
    }

    /// Make every subsequent call fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    fn check(&self) -> Result<(), StoreError> {
        let failure = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        match failure.as_ref() {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

/// Parse a stored `total_price` string into an exact decimal amount.
fn parse_amount(raw: &str) -> Result<Decimal, StoreError> {
    raw.parse().map_err(|source| StoreError::BadAmount {
        amount: raw.to_owned(),
        source,
    })
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn total_sales(
        &self,
        granularity: Granularity,
    ) -> Result<Vec<TotalSalesRow>, StoreError> {
        self.check()?;
        let mut buckets: HashMap<TimeBucket, Decimal> = HashMap::new();
        for order in &self.orders {
            let amount = parse_amount(&order.total_price)?;
            let bucket = TimeBucket::from_datetime(granularity, order.created_at);
            *buckets.entry(bucket).or_default() += amount;
        }
        let mut rows: Vec<_> = buckets
            .into_iter()
            .map(|(bucket, total_sales)| TotalSalesRow {
                bucket,
                total_sales,
            })
            .collect();
        rows.sort_by_key(|row| row.bucket.sort_key());
        Ok(rows)
    }

    async fn yearly_sales(&self) -> Result<Vec<YearlySalesRow>, StoreError> {
        self.check()?;
        let mut years: HashMap<i32, Decimal> = HashMap::new();
        for order in &self.orders {
            let amount = parse_amount(&order.total_price)?;
            *years.entry(order.created_at.year()).or_default() += amount;
        }
        let mut rows: Vec<_> = years
            .into_iter()
            .map(|(year, total_sales)| YearlySalesRow { year, total_sales })
            .collect();
        rows.sort_by_key(|row| row.year);
        Ok(rows)
    }

    async fn new_customers(&self) -> Result<Vec<NewCustomersRow>, StoreError> {
        self.check()?;
        let mut buckets: HashMap<TimeBucket, u64> = HashMap::new();
        for customer in &self.customers {
            let bucket = TimeBucket::from_datetime(Granularity::Daily, customer.created_at);
            *buckets.entry(bucket).or_default() += 1;
        }
        let mut rows: Vec<_> = buckets
            .into_iter()
            .map(|(bucket, count)| NewCustomersRow { bucket, count })
            .collect();
        rows.sort_by_key(|row| row.bucket.sort_key());
        Ok(rows)
    }

    async fn repeat_customers(
        &self,
        granularity: Granularity,
    ) -> Result<Vec<RepeatCustomersRow>, StoreError> {
        self.check()?;
        // Phase one: purchases per (customer, bucket).
        let mut purchases: HashMap<(&str, TimeBucket), u64> = HashMap::new();
        for order in &self.orders {
            let bucket = TimeBucket::from_datetime(granularity, order.created_at);
            *purchases.entry((order.email.as_str(), bucket)).or_default() += 1;
        }
        // Phase two: customers with more than one purchase, per bucket.
        let mut buckets: HashMap<TimeBucket, u64> = HashMap::new();
        for ((_, bucket), count) in purchases {
            if count > 1 {
                *buckets.entry(bucket).or_default() += 1;
            }
        }
        let mut rows: Vec<_> = buckets
            .into_iter()
            .map(|(bucket, repeat_customers)| RepeatCustomersRow {
                bucket,
                repeat_customers,
            })
            .collect();
        rows.sort_by_key(|row| row.bucket.sort_key());
        Ok(rows)
    }

    async fn customer_distribution(&self) -> Result<Vec<DistributionRow>, StoreError> {
        self.check()?;
        let mut cities: HashMap<Option<String>, u64> = HashMap::new();
        for customer in &self.customers {
            let city = customer
                .default_address
                .as_ref()
                .and_then(|address| address.city.clone());
            *cities.entry(city).or_default() += 1;
        }
        let mut rows: Vec<_> = cities
            .into_iter()
            .map(|(city, count)| DistributionRow { city, count })
            .collect();
        // Count descending; city as a deterministic tie-break.
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.city.cmp(&b.city)));
        Ok(rows)
    }

    async fn lifetime_value_by_cohort(&self) -> Result<Vec<CohortRow>, StoreError> {
        self.check()?;
        #[derive(Default)]
        struct Accumulated {
            total: Decimal,
            customers: HashSet<usize>,
        }
        // Inner join on email: a customer with no orders expands to no rows
        // and joins no cohort. Duplicate emails join the same orders more
        // than once, exactly as the lookup does.
        let mut cohorts: HashMap<CohortKey, Accumulated> = HashMap::new();
        for (customer_id, customer) in self.customers.iter().enumerate() {
            for order in self.orders.iter().filter(|o| o.email == customer.email) {
                let key = CohortKey {
                    cohort: order.created_at.month(),
                    year: order.created_at.year(),
                };
                let entry = cohorts.entry(key).or_default();
                entry.total += parse_amount(&order.total_price)?;
                entry.customers.insert(customer_id);
            }
        }
        let mut rows: Vec<_> = cohorts
            .into_iter()
            .map(|(cohort, accumulated)| CohortRow {
                cohort,
                lifetime_value: accumulated.total,
                customer_count: accumulated.customers.len() as u64,
            })
            .collect();
        rows.sort_by_key(|row| (row.cohort.year, row.cohort.cohort));
        Ok(rows)
    }
}
