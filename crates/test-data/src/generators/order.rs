//! Order generation with same-day repeat purchases.

use chrono::TimeDelta;
use rand::Rng;
use rand_distr::{Distribution, LogNormal};
use serde::Serialize;

use analytics::{memory::parse_timestamp, models::OrderRecord};

use crate::generators::customer::{GeneratedCustomer, render_in_store_offset};

/// Generated order ready for insertion.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedOrder {
    #[serde(flatten)]
    pub record: OrderRecord,
    pub order_number: u64,
    pub currency: String,
    pub financial_status: String,
}

/// Configuration for order generation.
#[derive(Debug, Clone)]
pub struct OrderGenConfig {
    /// Range of orders per customer (inclusive). Zero-order customers never appear
    /// in the order-based reports.
    pub orders_per_customer: (usize, usize),
    /// Probability that an order is followed by another on the same day.
    pub same_day_repeat_rate: f64,
    /// Maximum days between consecutive orders.
    pub max_days_between_orders: i64,
    /// Median order value.
    pub median_order_value: f64,
    /// Log-space spread of order values.
    pub order_value_sigma: f64,
    pub first_order_number: u64,
}

impl Default for OrderGenConfig {
    fn default() -> Self {
        Self {
            orders_per_customer: (0, 6),
            same_day_repeat_rate: 0.15,
            max_days_between_orders: 60,
            median_order_value: 45.0,
            order_value_sigma: 0.6,
            first_order_number: 1001,
        }
    }
}

/// Generates orders for already generated customers.
pub struct OrderGenerator {
    config: OrderGenConfig,
}

impl OrderGenerator {
    pub fn new() -> Self {
        Self {
            config: OrderGenConfig::default(),
        }
    }

    pub fn with_config(config: OrderGenConfig) -> Self {
        Self { config }
    }

    /// Generates orders for every customer and records each customer's order count.
    ///
    /// Orders are placed after the customer's sign-up. A same-day repeat lands a few
    /// hours after the previous order.
    pub fn generate_for(
        &self,
        customers: &mut [GeneratedCustomer],
        rng: &mut impl Rng,
    ) -> Vec<GeneratedOrder> {
        let value_dist = LogNormal::new(
            self.config.median_order_value.max(0.01).ln(),
            self.config.order_value_sigma,
        )
        .unwrap();

        let mut orders = Vec::new();
        let mut order_number = self.config.first_order_number;

        for customer in customers.iter_mut() {
            // Generated customers always carry valid timestamps.
            let Some(Ok(signed_up)) = customer.record.created_at.as_deref().map(parse_timestamp)
            else {
                continue;
            };

            let (min_orders, max_orders) = self.config.orders_per_customer;
            let count = rng.gen_range(min_orders..=max_orders.max(min_orders));

            let mut placed_at = signed_up + TimeDelta::minutes(rng.gen_range(5..=720));
            let mut repeat_next = false;

            for i in 0..count {
                if i > 0 && repeat_next {
                    placed_at += TimeDelta::minutes(rng.gen_range(10..=180));
                } else if i > 0 {
                    let days = rng.gen_range(0..=self.config.max_days_between_orders.max(0));
                    placed_at += TimeDelta::days(days) + TimeDelta::minutes(rng.gen_range(1..1440));
                }
                repeat_next = rng.gen_bool(self.config.same_day_repeat_rate.clamp(0.0, 1.0));

                let value: f64 = value_dist.sample(rng).max(1.0);
                orders.push(GeneratedOrder {
                    record: OrderRecord::new(
                        customer.record.id,
                        render_in_store_offset(placed_at, rng),
                        format!("{value:.2}"),
                    ),
                    order_number,
                    currency: "USD".to_string(),
                    financial_status: "paid".to_string(),
                });
                order_number += 1;
            }

            customer.orders_count = count as u32;
        }

        orders
    }
}

impl Default for OrderGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::CustomerGenerator;
    use analytics::memory::parse_price;

    #[test]
    fn test_orders_follow_signup() {
        let mut rng = rand::thread_rng();
        let mut customers = CustomerGenerator::new().generate_batch(30, &mut rng);
        let orders = OrderGenerator::new().generate_for(&mut customers, &mut rng);

        for order in &orders {
            let customer = customers
                .iter()
                .find(|c| Some(c.record.id) == order.record.customer_id())
                .unwrap();
            let signed_up = customer.record.created_at.as_deref().map(parse_timestamp);
            let placed = order.record.created_at.as_deref().map(parse_timestamp);
            assert!(placed.unwrap().unwrap() > signed_up.unwrap().unwrap());
            assert!(parse_price(&order.record.total_price).unwrap() >= 1.0);
        }

        let counted: u32 = customers.iter().map(|c| c.orders_count).sum();
        assert_eq!(counted as usize, orders.len());
    }

    #[test]
    fn test_order_numbers_are_sequential() {
        let mut rng = rand::thread_rng();
        let mut customers = CustomerGenerator::new().generate_batch(10, &mut rng);
        let orders = OrderGenerator::with_config(OrderGenConfig {
            orders_per_customer: (2, 2),
            ..Default::default()
        })
        .generate_for(&mut customers, &mut rng);

        assert_eq!(orders.len(), 20);
        for (i, order) in orders.iter().enumerate() {
            assert_eq!(order.order_number, 1001 + i as u64);
        }
    }

    #[test]
    fn test_prices_have_two_decimals() {
        let mut rng = rand::thread_rng();
        let mut customers = CustomerGenerator::new().generate_batch(10, &mut rng);
        let orders = OrderGenerator::with_config(OrderGenConfig {
            orders_per_customer: (1, 3),
            ..Default::default()
        })
        .generate_for(&mut customers, &mut rng);

        for order in orders {
            let (_, cents) = order.record.total_price.split_once('.').unwrap();
            assert_eq!(cents.len(), 2);
        }
    }
}
