use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// Source records. Ingested externally; this service only reads them.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRef {
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(default)]
    pub customer: Option<CustomerRef>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub total_price: String,
}

impl OrderRecord {
    pub fn new(
        customer_id: i64,
        created_at: impl Into<String>,
        total_price: impl Into<String>,
    ) -> Self {
        Self {
            customer: Some(CustomerRef {
                id: Some(customer_id),
            }),
            created_at: Some(created_at.into()),
            total_price: total_price.into(),
        }
    }

    pub fn customer_id(&self) -> Option<i64> {
        self.customer.as_ref().and_then(|c| c.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: i64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

impl CustomerRecord {
    pub fn new(id: i64, created_at: impl Into<String>, cities: &[&str]) -> Self {
        Self {
            id,
            created_at: Some(created_at.into()),
            addresses: cities
                .iter()
                .map(|city| Address {
                    city: Some(city.to_string()),
                })
                .collect(),
        }
    }
}

// Report rows. The engine emits `$round`ed doubles and `$sum: 1` integers; both decode
// into whole numbers. Bucket keys are `null` for records without a `created_at`.

fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value as i64)
}

fn optional_whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|v| v as i64))
}

/// Customers created on a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyNewCustomers {
    /// Calendar day, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(deserialize_with = "whole_number")]
    pub new_customers: i64,
}

/// Customers who placed more than one order on a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyRepeatCustomers {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(deserialize_with = "whole_number")]
    pub repeat_customers: i64,
}

/// Rounded order total for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(deserialize_with = "whole_number")]
    pub total_sales: i64,
}

/// Daily sales with the percentage change from the previous day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesGrowth {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(deserialize_with = "whole_number")]
    pub total_sales: i64,
    /// `null` for the first day in the series.
    #[serde(default, deserialize_with = "optional_whole_number")]
    pub growth_rate: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityDistribution {
    /// `null` when an address has no city.
    #[serde(default)]
    pub city: Option<String>,
    #[serde(deserialize_with = "whole_number")]
    pub value: i64,
}

/// Summed lifetime value of customers whose first order fell in `cohort`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CohortLifetimeValue {
    /// Calendar month, `YYYY-MM`.
    #[serde(default)]
    pub cohort: Option<String>,
    #[serde(deserialize_with = "whole_number")]
    pub lifetime_value: i64,
}
