pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod reports;
pub mod request_id;
pub mod source;

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::{HeaderValue, header},
    middleware,
    routing::get,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
use utoipa::OpenApi;

use crate::{
    config::Config,
    database::Database,
    handlers::{
        get_customers, get_geographical_distribution, get_lifetime_value, get_repeated_customers,
        get_sales, get_sales_growth, health_check, openapi_json,
    },
    models::{
        CityDistribution, CohortLifetimeValue, DailyNewCustomers, DailyRepeatCustomers,
        DailySales, DailySalesGrowth,
    },
    request_id::request_id_middleware,
    source::SharedSource,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::reports::get_customers,
        handlers::reports::get_repeated_customers,
        handlers::reports::get_sales,
        handlers::reports::get_sales_growth,
        handlers::reports::get_geographical_distribution,
        handlers::reports::get_lifetime_value,
        handlers::stats::health_check,
    ),
    components(schemas(
        DailyNewCustomers,
        DailyRepeatCustomers,
        DailySales,
        DailySalesGrowth,
        CityDistribution,
        CohortLifetimeValue,
    )),
    tags(
        (name = "reports", description = "Storefront analytics reports"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Report routes, mounted under `/api`.
fn api_routes() -> Router {
    Router::new()
        .route("/get-customers", get(get_customers))
        .route("/get-repeated-customers", get(get_repeated_customers))
        .route("/get-sales", get(get_sales))
        .route("/get-sales-growth", get(get_sales_growth))
        .route(
            "/get-geographical-distribution",
            get(get_geographical_distribution),
        )
        .route("/get-lifetime-value", get(get_lifetime_value))
}

pub fn create_router(source: SharedSource) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api_routes())
        .layer(Extension(source))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(CompressionLayer::new())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let db = Database::new(&config);
    let app = create_router(Arc::new(db));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!("Server running on port {}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
