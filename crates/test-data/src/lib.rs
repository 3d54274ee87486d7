//! Test data generation for the storefront analytics service.
//!
//! This crate generates Shopify-shaped customers and orders to support manual
//! verification of the reports and integration testing against MongoDB.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_data::prelude::*;
//!
//! // Seed a live database...
//! let scenario = ScenarioBuilder::new()
//!     .with_customers(200)
//!     .with_orders_per_customer(0, 5)
//!     .with_seed(7)
//!     .build(&db)
//!     .await?;
//!
//! // ...or evaluate the same records in memory.
//! let source = scenario.to_source();
//! ```

pub mod builders;
pub mod config;
pub mod db;
pub mod generators;

// Re-export the record types the generators produce
pub use analytics::models::{Address, CustomerRecord, OrderRecord};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{ScenarioBuilder, ScenarioMetrics, ScenarioResult};
    pub use crate::config::{DateWindow, SeedConfig};
    pub use crate::db::Seeder;
    pub use crate::generators::{
        CustomerGenConfig, CustomerGenerator, GeneratedCustomer, GeneratedOrder, OrderGenConfig,
        OrderGenerator,
    };
    pub use crate::{Address, CustomerRecord, OrderRecord};
}
