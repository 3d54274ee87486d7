//! Storefront report handlers.
//!
//! Each endpoint takes no parameters, runs one report over the full history and
//! returns its rows as a JSON array.

use axum::{Extension, response::Json};

use crate::{
    errors::AppError,
    models::{
        CityDistribution, CohortLifetimeValue, DailyNewCustomers, DailyRepeatCustomers,
        DailySales, DailySalesGrowth,
    },
    source::SharedSource,
};

/// New customers per day.
#[utoipa::path(
    get,
    path = "/api/get-customers",
    tag = "reports",
    responses(
        (status = 200, description = "New customers per day, ascending by date", body = [DailyNewCustomers]),
        (status = 500, description = "Report failed")
    )
)]
pub async fn get_customers(
    Extension(source): Extension<SharedSource>,
) -> Result<Json<Vec<DailyNewCustomers>>, AppError> {
    let rows = source.new_customers_by_day().await?;
    Ok(Json(rows))
}

/// Customers with more than one order on the same day.
#[utoipa::path(
    get,
    path = "/api/get-repeated-customers",
    tag = "reports",
    responses(
        (status = 200, description = "Repeat customers per day, ascending by date", body = [DailyRepeatCustomers]),
        (status = 500, description = "Report failed")
    )
)]
pub async fn get_repeated_customers(
    Extension(source): Extension<SharedSource>,
) -> Result<Json<Vec<DailyRepeatCustomers>>, AppError> {
    let rows = source.repeat_customers_by_day().await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/get-sales",
    tag = "reports",
    responses(
        (status = 200, description = "Rounded sales total per day", body = [DailySales]),
        (status = 500, description = "Report failed")
    )
)]
pub async fn get_sales(
    Extension(source): Extension<SharedSource>,
) -> Result<Json<Vec<DailySales>>, AppError> {
    let rows = source.sales_by_day().await?;
    Ok(Json(rows))
}

/// Daily sales with percentage growth over the previous day.
#[utoipa::path(
    get,
    path = "/api/get-sales-growth",
    tag = "reports",
    responses(
        (status = 200, description = "Daily sales and growth rate", body = [DailySalesGrowth]),
        (status = 500, description = "Report failed")
    )
)]
pub async fn get_sales_growth(
    Extension(source): Extension<SharedSource>,
) -> Result<Json<Vec<DailySalesGrowth>>, AppError> {
    let rows = source.sales_growth_by_day().await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/get-geographical-distribution",
    tag = "reports",
    responses(
        (status = 200, description = "Customer addresses per city", body = [CityDistribution]),
        (status = 500, description = "Report failed")
    )
)]
pub async fn get_geographical_distribution(
    Extension(source): Extension<SharedSource>,
) -> Result<Json<Vec<CityDistribution>>, AppError> {
    let rows = source.geographical_distribution().await?;
    Ok(Json(rows))
}

/// Lifetime value summed per first-purchase month.
#[utoipa::path(
    get,
    path = "/api/get-lifetime-value",
    tag = "reports",
    responses(
        (status = 200, description = "Lifetime value per cohort", body = [CohortLifetimeValue]),
        (status = 500, description = "Report failed")
    )
)]
pub async fn get_lifetime_value(
    Extension(source): Extension<SharedSource>,
) -> Result<Json<Vec<CohortLifetimeValue>>, AppError> {
    let rows = source.lifetime_value_by_cohort().await?;
    Ok(Json(rows))
}
