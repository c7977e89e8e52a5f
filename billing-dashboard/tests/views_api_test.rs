mod common;

use axum::http::{Method, StatusCode};
use billing_dashboard::models::{InvoiceDetail, LineItem, PipelineRun};
use billing_dashboard::services::api_client::{ApiError, InvoiceQuery};
use common::{customer, invoice, set, transport_error, usage, TestApp, PIPELINE_LIMIT};
use rust_decimal::Decimal;

fn date_scenario() -> Vec<billing_dashboard::models::UsageRecord> {
    vec![
        usage("2024-01-02", "prod_cloud_storage", 10),
        usage("2024-01-01", "prod_cloud_storage", 5),
        usage("2024-01-02", "prod_api_calls", 3),
    ]
}

#[tokio::test]
async fn usage_view_sums_cost_per_day_in_date_order() {
    let app = TestApp::spawn();
    set(&app.api.usage, Ok(date_scenario()));

    let (status, body) = app.get("/api/views/usage").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "ready");

    let daily = body["data"]["daily_cost"].as_array().unwrap();
    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0]["date"], "2024-01-01");
    assert_eq!(daily[0]["display"], "$5.00");
    assert_eq!(daily[1]["date"], "2024-01-02");
    assert_eq!(daily[1]["display"], "$13.00");
    assert_eq!(daily[1]["label"], "Jan 2");

    let products = body["data"]["product_summary"].as_array().unwrap();
    assert_eq!(products[0]["label"], "Cloud Storage");
    assert_eq!(products[1]["label"], "Api Calls");
}

#[tokio::test]
async fn usage_product_filter_is_applied_locally() {
    let app = TestApp::spawn();
    set(&app.api.usage, Ok(date_scenario()));

    let (_, body) = app
        .get("/api/views/usage?product_id=prod_api_calls&date_from=2024-01-01")
        .await;

    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["product_summary"].as_array().unwrap().len(), 1);

    let queries = app.api.usage_queries.lock().unwrap().clone();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].date_from.as_deref(), Some("2024-01-01"));
    assert_eq!(queries[0].product_id, None);
}

#[tokio::test]
async fn empty_usage_is_an_empty_state_not_an_error() {
    let app = TestApp::spawn();

    let (status, body) = app.get("/api/views/customers/cust_1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["name"], "Acme Corp");
    assert_eq!(body["daily_cost"]["state"], "empty");
    assert_eq!(body["daily_cost"]["message"], "No usage data available");
    assert_eq!(body["products"]["state"], "empty");
}

#[tokio::test]
async fn transport_failure_then_retry_shows_fresh_data() {
    let app = TestApp::spawn();
    set(&app.api.usage, Err(transport_error()));

    let (status, body) = app.get("/api/views/usage").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["state"], "error");
    assert_eq!(body["retryable"], true);

    set(&app.api.usage, Ok(date_scenario()));
    let (status, body) = app.get("/api/views/usage?refresh=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "ready");
    assert!(body.get("stale_error").is_none());
    assert_eq!(body["data"]["daily_cost"][1]["display"], "$13.00");
}

#[tokio::test]
async fn failed_entries_are_retried_on_plain_reads() {
    let app = TestApp::spawn();
    set(&app.api.pricing, Err(transport_error()));
    let (status, _) = app.get("/api/views/pricing").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    set(&app.api.pricing, Ok(vec![]));
    let (status, body) = app.get("/api/views/pricing").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "empty");
    assert_eq!(body["message"], "No pricing data available");
}

#[tokio::test]
async fn malformed_records_are_not_retryable() {
    let app = TestApp::spawn();
    set(
        &app.api.usage,
        Err(ApiError::Decode("invalid type: map, expected a sequence".into())),
    );

    let (status, body) = app.get("/api/views/usage").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_records() {
    let app = TestApp::spawn();
    set(&app.api.usage, Ok(date_scenario()));
    app.get("/api/views/usage").await;

    set(
        &app.api.usage,
        Err(ApiError::Status {
            status: 500,
            reason: "Internal Server Error".into(),
        }),
    );
    let (status, body) = app.get("/api/views/usage?refresh=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "ready");
    assert_eq!(body["stale_error"], "API error: 500 Internal Server Error");
    assert_eq!(body["data"]["daily_cost"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn cached_views_are_served_until_cleared() {
    let app = TestApp::spawn();
    set(&app.api.usage, Ok(date_scenario()));

    app.get("/api/views/usage").await;
    app.get("/api/views/usage").await;
    assert_eq!(app.api.usage_queries.lock().unwrap().len(), 1);

    let (status, _) = app.request(Method::DELETE, "/api/cache").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    app.get("/api/views/usage").await;
    assert_eq!(app.api.usage_queries.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn customer_search_is_case_insensitive() {
    let app = TestApp::spawn();

    let (status, body) = app.get("/api/views/customers?search=acme").await;

    assert_eq!(status, StatusCode::OK);
    let cards = body["customers"]["data"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["name"], "Acme Corp");
    assert_eq!(cards[0]["plan_label"], "Enterprise");
}

#[tokio::test]
async fn customer_search_without_matches_says_so() {
    let app = TestApp::spawn();

    let (_, body) = app.get("/api/views/customers?search=zzz").await;
    assert_eq!(body["customers"]["state"], "empty");
    assert_eq!(body["customers"]["message"], "No customers match your search");

    set(&app.api.customers, Ok(vec![]));
    let (_, body) = app.get("/api/views/customers?refresh=true").await;
    assert_eq!(body["customers"]["message"], "No customers found");
}

#[tokio::test]
async fn unknown_customer_is_not_found() {
    let app = TestApp::spawn();
    set(
        &app.api.customers,
        Ok(vec![customer("cust_1", "Acme Corp", "active", "plan_pro")]),
    );

    let (status, _) = app.get("/api/views/customers/cust_404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_panels_fail_independently() {
    let app = TestApp::spawn();
    set(&app.api.usage, Ok(date_scenario()));
    set(
        &app.api.invoices,
        Err(ApiError::Status {
            status: 503,
            reason: "Service Unavailable".into(),
        }),
    );

    let (status, body) = app.get("/api/views/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kpis"]["state"], "ready");
    assert_eq!(body["kpis"]["data"][0]["display"], "$1,234.50");
    assert_eq!(body["kpis"]["data"][3]["display"], "1,234,567");
    assert_eq!(body["revenue"]["state"], "ready");
    assert_eq!(body["usage_by_product"]["data"][0]["label"], "Cloud Storage");
    assert_eq!(body["recent_invoices"]["state"], "error");
    assert_eq!(
        body["recent_invoices"]["message"],
        "API error: 503 Service Unavailable"
    );
}

#[tokio::test]
async fn dashboard_lists_five_most_recent_invoices() {
    let app = TestApp::spawn();
    let invoices = (0..8)
        .map(|i| invoice(&format!("inv_{:08}", i), "paid"))
        .collect();
    set(&app.api.invoices, Ok(invoices));

    let (_, body) = app.get("/api/views/dashboard").await;

    let recent = body["recent_invoices"]["data"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["short_id"], "inv_0000...");
}

#[tokio::test]
async fn invoice_filters_are_forwarded_upstream() {
    let app = TestApp::spawn();
    set(&app.api.invoices, Ok(vec![invoice("inv_1", "paid")]));

    let (status, body) = app
        .get("/api/views/invoices?status=paid&customer_id=all")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoices"]["data"][0]["tone"], "success");
    assert_eq!(body["customers"].as_array().unwrap().len(), 2);

    let queries = app.api.invoice_queries.lock().unwrap().clone();
    assert_eq!(
        queries,
        vec![InvoiceQuery {
            customer_id: None,
            status: Some("paid".to_string()),
        }]
    );
}

#[tokio::test]
async fn invoice_detail_flags_mismatches() {
    let app = TestApp::spawn();
    let mut header = invoice("inv_1", "issued");
    header.total = Decimal::new(125, 0);
    set(
        &app.api.invoice_detail,
        Ok(InvoiceDetail {
            invoice: header,
            line_items: vec![LineItem {
                line_item_id: "li_1".to_string(),
                line_type: "usage".to_string(),
                product_id: "prod_api_calls".to_string(),
                unit: "call".to_string(),
                quantity: Decimal::new(3, 0),
                unit_price: Decimal::new(2, 0),
                amount: Decimal::new(7, 0),
            }],
        }),
    );

    let (status, body) = app.get("/api/views/invoices/inv_1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["invoice"]["total_display"], "$125.00");
    assert_eq!(
        body["data"]["pdf_url"],
        "http://billing-api.test/invoices/inv_1/pdf"
    );
    assert_eq!(
        body["data"]["reconciliation"]["mismatched_line_items"][0],
        "li_1"
    );
    assert_eq!(body["data"]["line_items"]["data"][0]["mismatch"], true);
}

#[tokio::test]
async fn customer_detail_reports_an_unreachable_api_as_bad_gateway() {
    let app = TestApp::spawn();
    set(&app.api.customers, Err(transport_error()));

    let (status, body) = app.get("/api/views/customers/cust_1").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["error"],
        "Bad Gateway: transport error: error sending request: connection refused"
    );
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn invoice_detail_upstream_failure_is_bad_gateway() {
    let app = TestApp::spawn();
    set(
        &app.api.invoice_detail,
        Err(ApiError::Status {
            status: 500,
            reason: "Internal Server Error".into(),
        }),
    );

    let (status, body) = app.get("/api/views/invoices/inv_1").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Bad Gateway: API error: 500 Internal Server Error");
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn missing_invoice_is_not_found() {
    let app = TestApp::spawn();

    let (status, body) = app.get("/api/views/invoices/inv_missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invoice not found");
}

#[tokio::test]
async fn pipeline_limit_defaults_and_overrides() {
    let app = TestApp::spawn();
    set(
        &app.api.pipeline,
        Ok(vec![PipelineRun {
            run_id: "run_1".to_string(),
            dag_id: "billing_daily".to_string(),
            status: "success".to_string(),
            created_ts: "2024-01-02T15:04:00".to_string(),
        }]),
    );

    let (_, body) = app.get("/api/views/pipeline").await;
    assert_eq!(body["data"][0]["icon"], "check-circle");
    assert_eq!(body["data"][0]["created"], "Tue, Jan 2, 2024, 03:04 PM");

    app.get("/api/views/pipeline?limit=5").await;

    let limits = app.api.pipeline_limits.lock().unwrap().clone();
    assert_eq!(limits, vec![PIPELINE_LIMIT, 5]);
}
