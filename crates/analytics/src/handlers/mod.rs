//! HTTP request handlers for the analytics API.

pub mod reports;
pub mod stats;

// Re-export handlers from submodules (including utoipa __path types for OpenAPI)
pub use reports::{
    __path_get_customers, __path_get_geographical_distribution, __path_get_lifetime_value,
    __path_get_repeated_customers, __path_get_sales, __path_get_sales_growth, get_customers,
    get_geographical_distribution, get_lifetime_value, get_repeated_customers, get_sales,
    get_sales_growth,
};
pub use stats::{__path_health_check, health_check, openapi_json};
