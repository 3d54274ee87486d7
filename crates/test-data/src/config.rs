//! Configuration types for test data generation.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};

/// Window of calendar days over which customers sign up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub days: u32,
}

impl DateWindow {
    pub const fn new(start: NaiveDate, days: u32) -> Self {
        Self { start, days }
    }
}

impl Default for DateWindow {
    fn default() -> Self {
        // Calendar year 2024.
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
        Self { start, days: 366 }
    }
}

/// UTC offsets (in minutes) storefront timestamps are rendered in.
///
/// Shopify stores `created_at` in the shop's local offset, so the same UTC day can
/// appear under different local dates.
pub const STORE_OFFSETS_MINUTES: [i32; 5] = [-8 * 60, -5 * 60, 0, 60, 5 * 60 + 30];

pub fn store_offset(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix())
}

/// Configuration for seeding operations.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Number of customers to generate.
    pub customer_count: usize,

    /// Batch size for `insert_many` calls.
    pub batch_size: usize,

    /// Drop existing collections before inserting.
    pub reset: bool,

    /// Fixed RNG seed for reproducible data.
    pub seed: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            customer_count: 500,
            batch_size: 500,
            reset: false,
            seed: 12345,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_offsets_are_valid() {
        for minutes in STORE_OFFSETS_MINUTES {
            assert_eq!(store_offset(minutes).local_minus_utc(), minutes * 60);
        }
    }

    #[test]
    fn test_default_window_covers_2024() {
        let window = DateWindow::default();
        assert_eq!(window.start.to_string(), "2024-01-01");
        assert_eq!(window.days, 366);
    }
}
