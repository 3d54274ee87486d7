//! End-to-end tests of the report endpoints over an in-memory report source.
//!
//! These drive the full router (middleware included) with `tower::ServiceExt::oneshot`
//! and need no database.

use std::sync::Arc;

use analytics::{
    create_router,
    memory::InMemorySource,
    models::{CustomerRecord, OrderRecord},
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn router_with(customers: Vec<CustomerRecord>, orders: Vec<OrderRecord>) -> Router {
    create_router(Arc::new(InMemorySource::new(customers, orders)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn storefront_orders() -> Vec<OrderRecord> {
    vec![
        OrderRecord::new(1, "2024-01-05T09:12:00-05:00", "10.00"),
        OrderRecord::new(1, "2024-01-05T14:40:00-05:00", "15.00"),
        OrderRecord::new(2, "2024-01-05T11:05:00-05:00", "5.00"),
    ]
}

fn storefront_customers() -> Vec<CustomerRecord> {
    vec![
        CustomerRecord::new(2, "2024-01-04T08:00:00Z", &["Boston"]),
        CustomerRecord::new(1, "2024-01-03T08:00:00Z", &["Austin"]),
    ]
}

#[tokio::test]
async fn sales_sums_orders_per_day() {
    let app = router_with(vec![], storefront_orders());
    let (status, body) = get(app, "/api/get-sales").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "date": "2024-01-05", "totalSales": 30 }]));
}

#[tokio::test]
async fn repeated_customers_counts_multi_order_days() {
    let app = router_with(vec![], storefront_orders());
    let (status, body) = get(app, "/api/get-repeated-customers").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "date": "2024-01-05", "repeatCustomers": 1 }]));
}

#[tokio::test]
async fn geographical_distribution_is_alphabetical() {
    let app = router_with(storefront_customers(), vec![]);
    let (status, body) = get(app, "/api/get-geographical-distribution").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "city": "Austin", "value": 1 },
            { "city": "Boston", "value": 1 }
        ])
    );
}

#[tokio::test]
async fn customers_by_day() {
    let app = router_with(storefront_customers(), vec![]);
    let (status, body) = get(app, "/api/get-customers").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "date": "2024-01-03", "newCustomers": 1 },
            { "date": "2024-01-04", "newCustomers": 1 }
        ])
    );
}

#[tokio::test]
async fn sales_growth_first_day_is_null() {
    let orders = vec![
        OrderRecord::new(1, "2024-02-01", "200.00"),
        OrderRecord::new(2, "2024-02-02", "250.00"),
        OrderRecord::new(3, "2024-02-03", "200.00"),
    ];
    let app = router_with(vec![], orders);
    let (status, body) = get(app, "/api/get-sales-growth").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "date": "2024-02-01", "totalSales": 200, "growthRate": null },
            { "date": "2024-02-02", "totalSales": 250, "growthRate": 25 },
            { "date": "2024-02-03", "totalSales": 200, "growthRate": -20 }
        ])
    );
}

#[tokio::test]
async fn lifetime_value_by_cohort() {
    let orders = vec![
        OrderRecord::new(1, "2024-01-30T10:00:00Z", "40.00"),
        OrderRecord::new(1, "2024-02-14T10:00:00Z", "60.00"),
        OrderRecord::new(2, "2024-02-01T10:00:00Z", "12.49"),
    ];
    let app = router_with(vec![], orders);
    let (status, body) = get(app, "/api/get-lifetime-value").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "cohort": "2024-01", "lifetimeValue": 100 },
            { "cohort": "2024-02", "lifetimeValue": 12 }
        ])
    );
}

#[tokio::test]
async fn missing_created_at_reports_null_keys() {
    let mut undated = OrderRecord::new(3, "", "8.00");
    undated.created_at = None;
    let mut orders = storefront_orders();
    orders.push(undated);

    let (status, body) = get(router_with(vec![], orders.clone()), "/api/get-sales").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "date": null, "totalSales": 8 },
            { "date": "2024-01-05", "totalSales": 30 }
        ])
    );

    let (status, body) = get(router_with(vec![], orders), "/api/get-lifetime-value").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "cohort": null, "lifetimeValue": 8 },
            { "cohort": "2024-01", "lifetimeValue": 30 }
        ])
    );
}

#[tokio::test]
async fn empty_collections_return_empty_arrays() {
    for uri in [
        "/api/get-customers",
        "/api/get-repeated-customers",
        "/api/get-sales",
        "/api/get-sales-growth",
        "/api/get-geographical-distribution",
        "/api/get-lifetime-value",
    ] {
        let (status, body) = get(router_with(vec![], vec![]), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!([]), "{uri}");
    }
}

#[tokio::test]
async fn malformed_date_fails_whole_report() {
    let mut orders = storefront_orders();
    orders.push(OrderRecord::new(3, "05/01/2024", "1.00"));
    let app = router_with(vec![], orders);
    let (status, body) = get(app, "/api/get-sales").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("05/01/2024"), "{message}");
}

#[tokio::test]
async fn malformed_customer_date_fails_customers_report() {
    let customers = vec![CustomerRecord::new(1, "yesterday", &["Austin"])];
    let (status, body) = get(router_with(customers.clone(), vec![]), "/api/get-customers").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].is_string());

    // The city report never parses dates.
    let (status, _) = get(
        router_with(customers, vec![]),
        "/api/get-geographical-distribution",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_cors_and_request_id_headers() {
    let app = router_with(vec![], vec![]);
    let response = app
        .oneshot(
            Request::get("/api/get-sales")
                .header(header::ORIGIN, "https://dashboard.example.com")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(response.headers()["x-request-id"], "abc-123");
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
}

#[tokio::test]
async fn health_check_is_ok() {
    let (status, _) = get(router_with(vec![], vec![]), "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn openapi_lists_report_paths() {
    let (status, body) = get(router_with(vec![], vec![]), "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/get-sales-growth"));
    assert!(paths.contains_key("/api/get-lifetime-value"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, _) = get(router_with(vec![], vec![]), "/api/get-refunds").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
