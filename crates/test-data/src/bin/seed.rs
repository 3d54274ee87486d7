//! Default seed script - fills the analytics database with a synthetic store
//!
//! Run with:
//! ```
//! cargo run -p test-data --bin seed
//! ```
//!
//! Reads `MONGODB_URI` and `ANALYTICS_DATABASE` like the server does.
//! `SEED_CUSTOMERS` overrides the customer count and `SEED_RESET=1` drops the
//! collections first.

use analytics::config::Config;
use mongodb::Client;
use test_data::{builders::ScenarioBuilder, config::SeedConfig, db::Seeder};
use tracing_subscriber::EnvFilter;

fn seed_config() -> SeedConfig {
    let defaults = SeedConfig::default();
    SeedConfig {
        customer_count: std::env::var("SEED_CUSTOMERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.customer_count),
        reset: std::env::var("SEED_RESET").is_ok_and(|v| v == "1" || v == "true"),
        ..defaults
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let seed = seed_config();

    let client = Client::with_uri_str(&config.mongodb_uri).await?;
    let db = client.database(&config.database_name);

    tracing::info!("Connected to database {}", config.database_name);

    if seed.reset {
        Seeder::new(db.clone()).reset().await?;
    }

    let result = ScenarioBuilder::comprehensive_test()
        .with_customers(seed.customer_count)
        .with_batch_size(seed.batch_size)
        .with_seed(seed.seed) // Reproducible data
        .build(&db)
        .await?;

    // Summary output
    tracing::info!("Seed completed!");
    tracing::info!("  Customers: {}", result.metrics.customer_count);
    tracing::info!("  Orders: {}", result.metrics.order_count);
    tracing::info!("  Generation: {} ms", result.metrics.generation_time_ms);
    tracing::info!("  Seeding: {} ms", result.metrics.seeding_time_ms);

    Ok(())
}
