use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    errors::AppError,
    models::{
        CityDistribution, CohortLifetimeValue, DailyNewCustomers, DailyRepeatCustomers,
        DailySales, DailySalesGrowth,
    },
};

/// Anything that can produce the six storefront reports.
///
/// Every method computes over the whole source with rows sorted ascending by the
/// report's bucket key.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn new_customers_by_day(&self) -> Result<Vec<DailyNewCustomers>, AppError>;

    async fn repeat_customers_by_day(&self) -> Result<Vec<DailyRepeatCustomers>, AppError>;

    async fn sales_by_day(&self) -> Result<Vec<DailySales>, AppError>;

    async fn sales_growth_by_day(&self) -> Result<Vec<DailySalesGrowth>, AppError>;

    async fn geographical_distribution(&self) -> Result<Vec<CityDistribution>, AppError>;

    async fn lifetime_value_by_cohort(&self) -> Result<Vec<CohortLifetimeValue>, AppError>;
}

pub type SharedSource = Arc<dyn ReportSource>;
