//! Fluent builder APIs for test scenarios.
//!
//! The [`ScenarioBuilder`] bundles customer and order generation into one
//! reproducible storefront.

mod scenario;

pub use scenario::{ScenarioBuilder, ScenarioMetrics, ScenarioResult};
