//! In-memory report evaluation.
//!
//! Computes every [`crate::reports::Report`] in application code over plain record
//! vectors, following the aggregation engine's semantics: timestamps are converted
//! to UTC before bucketing, parse failures abort the whole report, a missing
//! `created_at` buckets under a `null` key that sorts first, and `$round` rounds
//! half to even on the final values only.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{
    errors::{AppError, ReportError},
    models::{
        CityDistribution, CohortLifetimeValue, CustomerRecord, DailyNewCustomers,
        DailyRepeatCustomers, DailySales, DailySalesGrowth, OrderRecord,
    },
    source::ReportSource,
};

const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a stored timestamp string into a UTC instant.
///
/// Accepts RFC 3339 with an offset (Shopify's format), offsets written without a
/// colon (`-0500`), naive date-times (taken as UTC), and bare `YYYY-MM-DD` dates
/// (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ReportError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(raw, OFFSET_FORMAT) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ReportError::InvalidDate(raw.to_string()))
}

pub fn parse_price(raw: &str) -> Result<f64, ReportError> {
    raw.parse::<f64>()
        .map_err(|_| ReportError::InvalidNumber(raw.to_string()))
}

/// Parses an optional timestamp; a missing one stays `None`.
fn parse_optional_timestamp(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ReportError> {
    raw.map(parse_timestamp).transpose()
}

fn day_key(raw: Option<&str>) -> Result<Option<String>, ReportError> {
    Ok(parse_optional_timestamp(raw)?.map(|ts| ts.format("%Y-%m-%d").to_string()))
}

/// Half-to-even rounding to a whole number.
fn round_whole(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Unrounded order totals per day, ascending by day.
fn daily_totals(orders: &[OrderRecord]) -> Result<BTreeMap<Option<String>, f64>, ReportError> {
    let mut totals: BTreeMap<Option<String>, f64> = BTreeMap::new();
    for order in orders {
        let day = day_key(order.created_at.as_deref())?;
        let price = parse_price(&order.total_price)?;
        *totals.entry(day).or_default() += price;
    }
    Ok(totals)
}

pub fn new_customers_by_day(
    customers: &[CustomerRecord],
) -> Result<Vec<DailyNewCustomers>, ReportError> {
    let mut days: BTreeMap<Option<String>, i64> = BTreeMap::new();
    for customer in customers {
        *days.entry(day_key(customer.created_at.as_deref())?).or_default() += 1;
    }

    Ok(days
        .into_iter()
        .map(|(date, new_customers)| DailyNewCustomers {
            date,
            new_customers,
        })
        .collect())
}

pub fn repeat_customers_by_day(
    orders: &[OrderRecord],
) -> Result<Vec<DailyRepeatCustomers>, ReportError> {
    let mut pairs: HashMap<(Option<i64>, Option<String>), i64> = HashMap::new();
    for order in orders {
        let day = day_key(order.created_at.as_deref())?;
        *pairs.entry((order.customer_id(), day)).or_default() += 1;
    }

    let mut days: BTreeMap<Option<String>, i64> = BTreeMap::new();
    for ((_, day), orders_count) in pairs {
        if orders_count > 1 {
            *days.entry(day).or_default() += 1;
        }
    }

    Ok(days
        .into_iter()
        .map(|(date, repeat_customers)| DailyRepeatCustomers {
            date,
            repeat_customers,
        })
        .collect())
}

pub fn sales_by_day(orders: &[OrderRecord]) -> Result<Vec<DailySales>, ReportError> {
    Ok(daily_totals(orders)?
        .into_iter()
        .map(|(date, total)| DailySales {
            date,
            total_sales: round_whole(total),
        })
        .collect())
}

/// Daily sales paired with the change from the preceding day in sorted order.
pub fn sales_growth_by_day(orders: &[OrderRecord]) -> Result<Vec<DailySalesGrowth>, ReportError> {
    let totals = daily_totals(orders)?;
    let mut rows = Vec::with_capacity(totals.len());
    let mut previous: Option<f64> = None;

    for (date, total) in totals {
        let growth_rate = match previous {
            None => None,
            Some(prev) if prev == 0.0 => return Err(ReportError::DivideByZero),
            Some(prev) => Some(round_whole((total - prev) / prev * 100.0)),
        };

        rows.push(DailySalesGrowth {
            date,
            total_sales: round_whole(total),
            growth_rate,
        });
        previous = Some(total);
    }

    Ok(rows)
}

pub fn geographical_distribution(customers: &[CustomerRecord]) -> Vec<CityDistribution> {
    // None orders before Some, matching the engine's null-first sort.
    let mut cities: BTreeMap<Option<String>, i64> = BTreeMap::new();
    for address in customers.iter().flat_map(|c| &c.addresses) {
        *cities.entry(address.city.clone()).or_default() += 1;
    }

    cities
        .into_iter()
        .map(|(city, value)| CityDistribution { city, value })
        .collect()
}

pub fn lifetime_value_by_cohort(
    orders: &[OrderRecord],
) -> Result<Vec<CohortLifetimeValue>, ReportError> {
    // `$min` skips missing dates; a customer with none lands in the `null` cohort.
    let mut per_customer: HashMap<Option<i64>, (Option<DateTime<Utc>>, f64)> = HashMap::new();
    for order in orders {
        let placed_at = parse_optional_timestamp(order.created_at.as_deref())?;
        let price = parse_price(&order.total_price)?;

        per_customer
            .entry(order.customer_id())
            .and_modify(|(first, value)| {
                *first = match (*first, placed_at) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
                *value += price;
            })
            .or_insert((placed_at, price));
    }

    let mut cohorts: BTreeMap<Option<String>, f64> = BTreeMap::new();
    for (first_purchase, lifetime_value) in per_customer.into_values() {
        let cohort = first_purchase.map(|ts| ts.format("%Y-%m").to_string());
        *cohorts.entry(cohort).or_default() += lifetime_value;
    }

    Ok(cohorts
        .into_iter()
        .map(|(cohort, value)| CohortLifetimeValue {
            cohort,
            lifetime_value: round_whole(value),
        })
        .collect())
}

/// Report source over records held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    customers: Vec<CustomerRecord>,
    orders: Vec<OrderRecord>,
}

impl InMemorySource {
    pub fn new(customers: Vec<CustomerRecord>, orders: Vec<OrderRecord>) -> Self {
        Self { customers, orders }
    }

    pub fn with_customers(mut self, customers: Vec<CustomerRecord>) -> Self {
        self.customers = customers;
        self
    }

    pub fn with_orders(mut self, orders: Vec<OrderRecord>) -> Self {
        self.orders = orders;
        self
    }

    pub fn customers(&self) -> &[CustomerRecord] {
        &self.customers
    }

    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }
}

#[async_trait]
impl ReportSource for InMemorySource {
    async fn new_customers_by_day(&self) -> Result<Vec<DailyNewCustomers>, AppError> {
        Ok(new_customers_by_day(&self.customers)?)
    }

    async fn repeat_customers_by_day(&self) -> Result<Vec<DailyRepeatCustomers>, AppError> {
        Ok(repeat_customers_by_day(&self.orders)?)
    }

    async fn sales_by_day(&self) -> Result<Vec<DailySales>, AppError> {
        Ok(sales_by_day(&self.orders)?)
    }

    async fn sales_growth_by_day(&self) -> Result<Vec<DailySalesGrowth>, AppError> {
        Ok(sales_growth_by_day(&self.orders)?)
    }

    async fn geographical_distribution(&self) -> Result<Vec<CityDistribution>, AppError> {
        Ok(geographical_distribution(&self.customers))
    }

    async fn lifetime_value_by_cohort(&self) -> Result<Vec<CohortLifetimeValue>, AppError> {
        Ok(lifetime_value_by_cohort(&self.orders)?)
    }
}
