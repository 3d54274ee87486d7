//! Customer generation with addresses.

use chrono::{DateTime, TimeDelta, Utc};
use fake::{
    Fake,
    faker::address::en::CityName,
    faker::name::en::{FirstName, LastName},
};
use rand::Rng;
use serde::Serialize;

use analytics::models::{Address, CustomerRecord};

use crate::config::{DateWindow, STORE_OFFSETS_MINUTES, store_offset};

/// Generated customer ready for insertion.
///
/// Serializes to a Shopify-shaped document: the fields the reports read plus
/// profile fields they ignore.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedCustomer {
    #[serde(flatten)]
    pub record: CustomerRecord,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub orders_count: u32,
}

/// Configuration for customer generation.
#[derive(Debug, Clone)]
pub struct CustomerGenConfig {
    /// Sign-up window.
    pub window: DateWindow,
    /// Number of distinct cities addresses are drawn from.
    pub city_pool_size: usize,
    /// Range of address count per customer (inclusive).
    pub addresses_per_customer: (usize, usize),
    /// First customer id; ids are sequential from here.
    pub first_id: i64,
}

impl Default for CustomerGenConfig {
    fn default() -> Self {
        Self {
            window: DateWindow::default(),
            city_pool_size: 25,
            addresses_per_customer: (0, 2),
            first_id: 6_000_000_000_000,
        }
    }
}

/// Generates storefront customers.
pub struct CustomerGenerator {
    config: CustomerGenConfig,
}

impl CustomerGenerator {
    pub fn new() -> Self {
        Self {
            config: CustomerGenConfig::default(),
        }
    }

    pub fn with_config(config: CustomerGenConfig) -> Self {
        Self { config }
    }

    /// Generates `count` customers whose cities come from a shared pool, so the
    /// geographic report has repeated cities.
    pub fn generate_batch(&self, count: usize, rng: &mut impl Rng) -> Vec<GeneratedCustomer> {
        let cities = self.city_pool(rng);
        (0..count)
            .map(|i| self.generate(self.config.first_id + i as i64, &cities, rng))
            .collect()
    }

    fn city_pool(&self, rng: &mut impl Rng) -> Vec<String> {
        let mut cities: Vec<String> = (0..self.config.city_pool_size.max(1))
            .map(|_| CityName().fake_with_rng(rng))
            .collect();
        cities.sort();
        cities.dedup();
        cities
    }

    fn generate(&self, id: i64, cities: &[String], rng: &mut impl Rng) -> GeneratedCustomer {
        let first_name: String = FirstName().fake_with_rng(rng);
        let last_name: String = LastName().fake_with_rng(rng);
        let email = format!(
            "{}.{}{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            rng.gen_range(1..999)
        );

        let (min_addr, max_addr) = self.config.addresses_per_customer;
        let addresses = (0..rng.gen_range(min_addr..=max_addr.max(min_addr)))
            .map(|_| Address {
                city: Some(cities[rng.gen_range(0..cities.len())].clone()),
            })
            .collect();

        GeneratedCustomer {
            record: CustomerRecord {
                id,
                created_at: Some(random_timestamp(&self.config.window, rng)),
                addresses,
            },
            first_name,
            last_name,
            email,
            orders_count: 0,
        }
    }
}

impl Default for CustomerGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Random instant inside `window`, rendered RFC 3339 in a random store offset.
pub fn random_timestamp(window: &DateWindow, rng: &mut impl Rng) -> String {
    let start = window.start.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    let seconds = rng.gen_range(0..i64::from(window.days.max(1)) * 86_400);
    render_in_store_offset(start + TimeDelta::seconds(seconds), rng)
}

pub fn render_in_store_offset(instant: DateTime<Utc>, rng: &mut impl Rng) -> String {
    let minutes = STORE_OFFSETS_MINUTES[rng.gen_range(0..STORE_OFFSETS_MINUTES.len())];
    instant.with_timezone(&store_offset(minutes)).to_rfc3339()
}
