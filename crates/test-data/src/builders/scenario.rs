//! Fluent builder for constructing storefront scenarios.

use std::time::Instant;

use mongodb::Database;
use rand::{SeedableRng, rngs::StdRng};

use analytics::memory::InMemorySource;

use crate::config::DateWindow;
use crate::db::{SeedError, Seeder};
use crate::generators::{
    CustomerGenConfig, CustomerGenerator, GeneratedCustomer, GeneratedOrder, OrderGenConfig,
    OrderGenerator,
};

/// Result of building (and optionally seeding) a scenario.
#[derive(Debug)]
pub struct ScenarioResult {
    pub customers: Vec<GeneratedCustomer>,
    pub orders: Vec<GeneratedOrder>,
    pub metrics: ScenarioMetrics,
}

impl ScenarioResult {
    /// Report source over exactly the generated records.
    pub fn to_source(&self) -> InMemorySource {
        InMemorySource::new(
            self.customers.iter().map(|c| c.record.clone()).collect(),
            self.orders.iter().map(|o| o.record.clone()).collect(),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Time spent generating data (milliseconds).
    pub generation_time_ms: u64,
    /// Time spent seeding the database (milliseconds, 0 if `build_data` was used).
    pub seeding_time_ms: u64,
    pub customer_count: usize,
    pub order_count: usize,
}

/// Builder for creating storefront scenarios.
///
/// # Example
///
/// ```rust,ignore
/// let result = ScenarioBuilder::new()
///     .with_customers(200)
///     .with_orders_per_customer(1, 4)
///     .with_seed(7)
///     .build(&db)
///     .await?;
/// ```
pub struct ScenarioBuilder {
    customer_count: usize,
    customer_config: CustomerGenConfig,
    order_config: OrderGenConfig,
    batch_size: usize,
    seed: u64,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self {
            customer_count: 100,
            customer_config: CustomerGenConfig::default(),
            order_config: OrderGenConfig::default(),
            batch_size: 500,
            seed: 42,
        }
    }

    pub fn with_customers(mut self, count: usize) -> Self {
        self.customer_count = count;
        self
    }

    pub fn with_window(mut self, window: DateWindow) -> Self {
        self.customer_config.window = window;
        self
    }

    pub fn with_city_pool(mut self, size: usize) -> Self {
        self.customer_config.city_pool_size = size;
        self
    }

    pub fn with_orders_per_customer(mut self, min: usize, max: usize) -> Self {
        self.order_config.orders_per_customer = (min, max);
        self
    }

    /// Sets the probability that an order is followed by another on the same day.
    pub fn with_same_day_repeat_rate(mut self, rate: f64) -> Self {
        self.order_config.same_day_repeat_rate = rate;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets the random seed. The same seed always yields the same records.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generates the scenario without touching a database.
    pub fn build_data(&self) -> ScenarioResult {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut customers = CustomerGenerator::with_config(self.customer_config.clone())
            .generate_batch(self.customer_count, &mut rng);
        let orders = OrderGenerator::with_config(self.order_config.clone())
            .generate_for(&mut customers, &mut rng);

        let metrics = ScenarioMetrics {
            generation_time_ms: start.elapsed().as_millis() as u64,
            seeding_time_ms: 0,
            customer_count: customers.len(),
            order_count: orders.len(),
        };

        ScenarioResult {
            customers,
            orders,
            metrics,
        }
    }

    /// Generates the scenario and inserts it into `db`.
    pub async fn build(self, db: &Database) -> Result<ScenarioResult, SeedError> {
        let mut result = self.build_data();

        let seed_start = Instant::now();
        let seeder = Seeder::new(db.clone()).with_batch_size(self.batch_size);
        seeder.seed_customers(&result.customers).await?;
        seeder.seed_orders(&result.orders).await?;
        result.metrics.seeding_time_ms = seed_start.elapsed().as_millis() as u64;

        Ok(result)
    }

    /// A year of traffic for a mid-sized store.
    pub fn comprehensive_test() -> Self {
        Self::new()
            .with_customers(750)
            .with_city_pool(40)
            .with_orders_per_customer(0, 8)
            .with_same_day_repeat_rate(0.2)
            .with_batch_size(1000)
    }
}
