//! Entity generators for test data.
//!
//! - [`CustomerGenerator`]: customers with sign-up timestamps and city addresses
//! - [`OrderGenerator`]: orders per customer, including same-day repeat purchases

pub mod customer;
pub mod order;

pub use customer::{CustomerGenConfig, CustomerGenerator, GeneratedCustomer};
pub use order::{GeneratedOrder, OrderGenConfig, OrderGenerator};
