//! MongoDB-backed record store.

use futures_util::TryStreamExt;
use mongodb::bson::{self, Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use async_trait::async_trait;
use shopsight_core::Granularity;

use crate::config::AppConfig;
use crate::models::reports::{
    CohortRow, DistributionRow, NewCustomersRow, RepeatCustomersRow, TotalSalesRow, YearlySalesRow,
};

use super::{AnalyticsStore, StoreError, pipelines};

/// Record store backed by the live MongoDB deployment.
///
/// Holds one driver client for the process; the driver manages its own
/// connection pool at default settings. Every report method runs a single
/// aggregation and deserializes the returned documents into the report's
/// row type.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Connect using the configured connection string.
    ///
    /// The database is taken from `MONGODB_DATABASE` when set, otherwise
    /// from the path of the connection string.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string does not parse or names no
    /// database while `MONGODB_DATABASE` is unset. Connectivity itself is
    /// not verified here; call [`AnalyticsStore::ping`] for that.
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let options = ClientOptions::parse(config.mongodb_uri.expose_secret()).await?;
        let client = Client::with_options(options)?;
        let database = match &config.database {
            Some(name) => client.database(name),
            None => client.default_database().ok_or(StoreError::MissingDatabase)?,
        };
        Ok(Self { client, database })
    }

    /// Run an aggregation on a collection and deserialize every row.
    async fn aggregate<T: DeserializeOwned>(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<T>, StoreError> {
        let mut cursor = self
            .database
            .collection::<Document>(collection)
            .aggregate(pipeline)
            .await?;
        let mut rows = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            rows.push(bson::from_document(document)?);
        }
        Ok(rows)
    }
}

#[async_trait]
impl AnalyticsStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }

    async fn total_sales(
        &self,
        granularity: Granularity,
    ) -> Result<Vec<TotalSalesRow>, StoreError> {
        self.aggregate(pipelines::ORDERS, pipelines::total_sales(granularity))
            .await
    }

    async fn yearly_sales(&self) -> Result<Vec<YearlySalesRow>, StoreError> {
        self.aggregate(pipelines::ORDERS, pipelines::yearly_sales())
            .await
    }

    async fn new_customers(&self) -> Result<Vec<NewCustomersRow>, StoreError> {
        self.aggregate(pipelines::CUSTOMERS, pipelines::new_customers())
            .await
    }

    async fn repeat_customers(
        &self,
        granularity: Granularity,
    ) -> Result<Vec<RepeatCustomersRow>, StoreError> {
        self.aggregate(pipelines::ORDERS, pipelines::repeat_customers(granularity))
            .await
    }

    async fn customer_distribution(&self) -> Result<Vec<DistributionRow>, StoreError> {
        self.aggregate(pipelines::CUSTOMERS, pipelines::customer_distribution())
            .await
    }

    async fn lifetime_value_by_cohort(&self) -> Result<Vec<CohortRow>, StoreError> {
        self.aggregate(pipelines::CUSTOMERS, pipelines::lifetime_value_by_cohort())
            .await
    }
}
