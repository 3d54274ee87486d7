use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client,
    bson::{Document, doc, from_document},
};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use crate::{
    config::Config,
    errors::AppError,
    models::{
        CityDistribution, CohortLifetimeValue, DailyNewCustomers, DailyRepeatCustomers,
        DailySales, DailySalesGrowth,
    },
    reports::Report,
    source::ReportSource,
};

/// Lazily connected handle to the analytics database.
///
/// The first call to [`Database::handle`] connects and caches the handle; clones
/// share the cache. Construction is single-flight, so concurrent first requests
/// wait on one attempt. A failed attempt leaves the cache empty and the next call
/// tries again.
#[derive(Clone)]
pub struct Database {
    uri: String,
    name: String,
    handle: Arc<OnceCell<mongodb::Database>>,
}

impl Database {
    pub fn new(config: &Config) -> Self {
        Self {
            uri: config.mongodb_uri.clone(),
            name: config.database_name.clone(),
            handle: Arc::new(OnceCell::new()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }

    pub async fn handle(&self) -> Result<&mongodb::Database, AppError> {
        self.handle
            .get_or_try_init(|| async {
                self.connect().await.inspect_err(|e| {
                    tracing::error!("Failed to connect to the database: {e}");
                })
            })
            .await
    }

    async fn connect(&self) -> Result<mongodb::Database, AppError> {
        let client = Client::with_uri_str(&self.uri).await?;
        let database = client.database(&self.name);

        // The driver connects lazily; ping so connection failures surface here.
        database.run_command(doc! { "ping": 1 }).await?;

        tracing::info!("Connected to database {}", self.name);
        Ok(database)
    }

    async fn run_report<T>(&self, report: Report) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
    {
        let db = self.handle().await?;
        let collection = db.collection::<Document>(report.collection().name());

        tracing::debug!(report = report.name(), "Running aggregation");

        let documents: Vec<Document> = collection
            .aggregate(report.pipeline())
            .await?
            .try_collect()
            .await?;

        documents
            .into_iter()
            .map(|document| from_document(document).map_err(AppError::from))
            .collect()
    }
}

#[async_trait]
impl ReportSource for Database {
    async fn new_customers_by_day(&self) -> Result<Vec<DailyNewCustomers>, AppError> {
        self.run_report(Report::NewCustomers).await
    }

    async fn repeat_customers_by_day(&self) -> Result<Vec<DailyRepeatCustomers>, AppError> {
        self.run_report(Report::RepeatCustomers).await
    }

    async fn sales_by_day(&self) -> Result<Vec<DailySales>, AppError> {
        self.run_report(Report::Sales).await
    }

    async fn sales_growth_by_day(&self) -> Result<Vec<DailySalesGrowth>, AppError> {
        self.run_report(Report::SalesGrowth).await
    }

    async fn geographical_distribution(&self) -> Result<Vec<CityDistribution>, AppError> {
        self.run_report(Report::GeographicalDistribution).await
    }

    async fn lifetime_value_by_cohort(&self) -> Result<Vec<CohortLifetimeValue>, AppError> {
        self.run_report(Report::LifetimeValue).await
    }
}
