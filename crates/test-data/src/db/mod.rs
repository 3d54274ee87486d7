//! Database integration for seeding test data.
//!
//! The [`Seeder`] bulk-inserts generated customers and orders into the
//! collections the analytics reports read.

mod seeder;

pub use seeder::{SeedError, Seeder};
