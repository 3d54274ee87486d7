//! Named report plans.
//!
//! Each [`Report`] is a data-only description of one analytics computation: the
//! collection it reads and the aggregation pipeline the MongoDB engine runs for it.
//! The in-memory source in [`crate::memory`] implements the same semantics in
//! application code, so reports can be exercised without a live server.

use mongodb::bson::{Bson, Document, doc};

/// Source collections written by the storefront ingestion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCollection {
    Customers,
    Orders,
}

impl SourceCollection {
    pub fn name(self) -> &'static str {
        match self {
            SourceCollection::Customers => "shopifyCustomers",
            SourceCollection::Orders => "shopifyOrders",
        }
    }
}

/// One of the six analytics reports served under `/api`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Report {
    NewCustomers,
    RepeatCustomers,
    Sales,
    SalesGrowth,
    GeographicalDistribution,
    LifetimeValue,
}

impl Report {
    pub const ALL: [Report; 6] = [
        Report::NewCustomers,
        Report::RepeatCustomers,
        Report::Sales,
        Report::SalesGrowth,
        Report::GeographicalDistribution,
        Report::LifetimeValue,
    ];

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Report::NewCustomers => "new_customers",
            Report::RepeatCustomers => "repeat_customers",
            Report::Sales => "sales",
            Report::SalesGrowth => "sales_growth",
            Report::GeographicalDistribution => "geographical_distribution",
            Report::LifetimeValue => "lifetime_value",
        }
    }

    pub fn collection(self) -> SourceCollection {
        match self {
            Report::NewCustomers | Report::GeographicalDistribution => SourceCollection::Customers,
            Report::RepeatCustomers
            | Report::Sales
            | Report::SalesGrowth
            | Report::LifetimeValue => SourceCollection::Orders,
        }
    }

    /// Output field the rows are sorted by.
    pub fn bucket_key(self) -> &'static str {
        match self {
            Report::GeographicalDistribution => "city",
            Report::LifetimeValue => "cohort",
            _ => "date",
        }
    }

    pub fn pipeline(self) -> Vec<Document> {
        match self {
            Report::NewCustomers => new_customers_pipeline(),
            Report::RepeatCustomers => repeat_customers_pipeline(),
            Report::Sales => sales_pipeline(),
            Report::SalesGrowth => sales_growth_pipeline(),
            Report::GeographicalDistribution => geographical_distribution_pipeline(),
            Report::LifetimeValue => lifetime_value_pipeline(),
        }
    }
}

/// `YYYY-MM-DD` of a string timestamp field.
fn day_of(field: &str) -> Document {
    doc! {
        "$dateToString": {
            "format": "%Y-%m-%d",
            "date": { "$toDate": field },
        }
    }
}

/// Projects each order to its day and numeric total, then sums per day.
fn daily_sales_stages() -> Vec<Document> {
    vec![
        doc! {
            "$project": {
                "date": day_of("$created_at"),
                "total_price": { "$toDouble": "$total_price" },
            }
        },
        doc! {
            "$group": {
                "_id": "$date",
                "totalSales": { "$sum": "$total_price" },
            }
        },
    ]
}

fn new_customers_pipeline() -> Vec<Document> {
    vec![
        doc! { "$project": { "date": day_of("$created_at") } },
        doc! {
            "$group": {
                "_id": "$date",
                "newCustomers": { "$sum": 1 },
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "date": "$_id",
                "newCustomers": 1,
            }
        },
        doc! { "$sort": { "date": 1 } },
    ]
}

fn repeat_customers_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": {
                    "customer_id": "$customer.id",
                    "date": {
                        "$dateToString": {
                            "format": "%Y-%m-%d",
                            "date": { "$dateFromString": { "dateString": "$created_at" } },
                        }
                    },
                },
                "ordersCount": { "$sum": 1 },
            }
        },
        doc! { "$match": { "ordersCount": { "$gt": 1 } } },
        doc! {
            "$group": {
                "_id": "$_id.date",
                "repeatCustomers": { "$sum": 1 },
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "date": "$_id",
                "repeatCustomers": 1,
            }
        },
        doc! { "$sort": { "date": 1 } },
    ]
}

fn sales_pipeline() -> Vec<Document> {
    let mut stages = daily_sales_stages();
    stages.push(doc! {
        "$project": {
            "_id": 0,
            "date": "$_id",
            "totalSales": { "$round": ["$totalSales", 0] },
        }
    });
    stages.push(doc! { "$sort": { "date": 1 } });
    stages
}

fn sales_growth_pipeline() -> Vec<Document> {
    let mut stages = daily_sales_stages();
    stages.push(doc! { "$sort": { "_id": 1 } });
    stages.push(doc! {
        "$setWindowFields": {
            "partitionBy": Bson::Null,
            "sortBy": { "_id": 1 },
            "output": {
                "prevTotalSales": {
                    "$shift": { "output": "$totalSales", "by": -1 }
                }
            },
        }
    });
    stages.push(doc! {
        "$project": {
            "_id": 0,
            "date": "$_id",
            "totalSales": { "$round": ["$totalSales", 0] },
            "growthRate": {
                "$cond": {
                    "if": { "$eq": ["$prevTotalSales", Bson::Null] },
                    "then": Bson::Null,
                    "else": {
                        "$round": [
                            {
                                "$multiply": [
                                    {
                                        "$divide": [
                                            { "$subtract": ["$totalSales", "$prevTotalSales"] },
                                            "$prevTotalSales",
                                        ]
                                    },
                                    100,
                                ]
                            },
                            0,
                        ]
                    },
                }
            },
        }
    });
    stages.push(doc! { "$sort": { "date": 1 } });
    stages
}

fn geographical_distribution_pipeline() -> Vec<Document> {
    vec![
        doc! { "$unwind": "$addresses" },
        doc! {
            "$group": {
                "_id": "$addresses.city",
                "value": { "$sum": 1 },
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "city": "$_id",
                "value": 1,
            }
        },
        doc! { "$sort": { "city": 1 } },
    ]
}

fn lifetime_value_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": "$customer.id",
                "firstPurchaseDate": {
                    "$min": { "$dateFromString": { "dateString": "$created_at" } }
                },
                "lifetimeValue": { "$sum": { "$toDouble": "$total_price" } },
            }
        },
        doc! {
            "$group": {
                "_id": {
                    "cohort": {
                        "$dateToString": { "format": "%Y-%m", "date": "$firstPurchaseDate" }
                    }
                },
                "lifetimeValue": { "$sum": "$lifetimeValue" },
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "cohort": "$_id.cohort",
                "lifetimeValue": { "$round": ["$lifetimeValue", 0] },
            }
        },
        doc! { "$sort": { "cohort": 1 } },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_names(report: Report) -> Vec<String> {
        report
            .pipeline()
            .iter()
            .map(|stage| stage.keys().next().cloned().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_collections() {
        assert_eq!(Report::NewCustomers.collection().name(), "shopifyCustomers");
        assert_eq!(
            Report::GeographicalDistribution.collection().name(),
            "shopifyCustomers"
        );
        for report in [
            Report::RepeatCustomers,
            Report::Sales,
            Report::SalesGrowth,
            Report::LifetimeValue,
        ] {
            assert_eq!(report.collection().name(), "shopifyOrders");
        }
    }

    #[test]
    fn test_every_pipeline_ends_with_ascending_sort_on_bucket_key() {
        for report in Report::ALL {
            let pipeline = report.pipeline();
            let last = pipeline.last().expect("pipeline has stages");
            let sort = last.get_document("$sort").expect("last stage is $sort");
            assert_eq!(sort.len(), 1, "{}", report.name());
            assert_eq!(sort.get_i32(report.bucket_key()).unwrap(), 1, "{}", report.name());
        }
    }

    #[test]
    fn test_every_stage_has_single_operator() {
        for report in Report::ALL {
            for stage in report.pipeline() {
                assert_eq!(stage.len(), 1);
                assert!(stage.keys().all(|k| k.starts_with('$')));
            }
        }
    }

    #[test]
    fn test_repeat_customers_filters_pairs_with_more_than_one_order() {
        let pipeline = Report::RepeatCustomers.pipeline();
        let matcher = pipeline[1].get_document("$match").unwrap();
        let count = matcher.get_document("ordersCount").unwrap();
        assert_eq!(count.get_i32("$gt").unwrap(), 1);
    }

    #[test]
    fn test_sales_growth_uses_previous_row_window() {
        assert_eq!(
            stage_names(Report::SalesGrowth),
            vec!["$project", "$group", "$sort", "$setWindowFields", "$project", "$sort"]
        );
        let pipeline = Report::SalesGrowth.pipeline();
        let window = pipeline[3].get_document("$setWindowFields").unwrap();
        let shift = window
            .get_document("output")
            .and_then(|o| o.get_document("prevTotalSales"))
            .and_then(|p| p.get_document("$shift"))
            .unwrap();
        assert_eq!(shift.get_i32("by").unwrap(), -1);
    }

    #[test]
    fn test_geographical_distribution_unwinds_addresses() {
        assert_eq!(
            stage_names(Report::GeographicalDistribution),
            vec!["$unwind", "$group", "$project", "$sort"]
        );
    }

    #[test]
    fn test_report_names_are_unique() {
        let mut names: Vec<_> = Report::ALL.iter().map(|r| r.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Report::ALL.len());
    }
}
