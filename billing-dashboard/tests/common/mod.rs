//! Test helper module for billing-dashboard integration tests.
//!
//! Provides an in-memory billing API and a router wired to it.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use billing_dashboard::models::{
    Customer, DashboardSummary, Invoice, InvoiceDetail, PipelineRun, PricingRecord, UsageRecord,
};
use billing_dashboard::services::api_client::{
    ApiError, BillingDataSource, InvoiceQuery, UsageQuery,
};
use billing_dashboard::services::cache::DashboardCache;
use billing_dashboard::services::metrics::init_metrics;
use billing_dashboard::startup::build_router;
use billing_dashboard::AppState;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

pub const PIPELINE_LIMIT: u32 = 20;

/// Canned responses per record family, swappable mid-test.
pub struct FakeBillingApi {
    pub summary: Mutex<Result<DashboardSummary, ApiError>>,
    pub customers: Mutex<Result<Vec<Customer>, ApiError>>,
    pub usage: Mutex<Result<Vec<UsageRecord>, ApiError>>,
    pub customer_usage: Mutex<Result<Vec<UsageRecord>, ApiError>>,
    pub invoices: Mutex<Result<Vec<Invoice>, ApiError>>,
    pub invoice_detail: Mutex<Result<InvoiceDetail, ApiError>>,
    pub pricing: Mutex<Result<Vec<PricingRecord>, ApiError>>,
    pub pipeline: Mutex<Result<Vec<PipelineRun>, ApiError>>,

    pub usage_queries: Mutex<Vec<UsageQuery>>,
    pub invoice_queries: Mutex<Vec<InvoiceQuery>>,
    pub pipeline_limits: Mutex<Vec<u32>>,
}

impl Default for FakeBillingApi {
    fn default() -> Self {
        Self {
            summary: Mutex::new(Ok(summary())),
            customers: Mutex::new(Ok(vec![
                customer("cust_1", "Acme Corp", "active", "plan_enterprise"),
                customer("cust_2", "Other Co", "trial", "plan_starter"),
            ])),
            usage: Mutex::new(Ok(vec![])),
            customer_usage: Mutex::new(Ok(vec![])),
            invoices: Mutex::new(Ok(vec![])),
            invoice_detail: Mutex::new(Err(not_found())),
            pricing: Mutex::new(Ok(vec![])),
            pipeline: Mutex::new(Ok(vec![])),
            usage_queries: Mutex::new(vec![]),
            invoice_queries: Mutex::new(vec![]),
            pipeline_limits: Mutex::new(vec![]),
        }
    }
}

pub fn set<T>(slot: &Mutex<T>, value: T) {
    *slot.lock().unwrap() = value;
}

#[async_trait]
impl BillingDataSource for FakeBillingApi {
    async fn fetch_dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.summary.lock().unwrap().clone()
    }

    async fn fetch_customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.customers.lock().unwrap().clone()
    }

    async fn fetch_customer_usage(&self, _customer_id: &str) -> Result<Vec<UsageRecord>, ApiError> {
        self.customer_usage.lock().unwrap().clone()
    }

    async fn fetch_invoices(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>, ApiError> {
        self.invoice_queries.lock().unwrap().push(query.clone());
        self.invoices.lock().unwrap().clone()
    }

    async fn fetch_invoice_detail(&self, _invoice_id: &str) -> Result<InvoiceDetail, ApiError> {
        self.invoice_detail.lock().unwrap().clone()
    }

    async fn fetch_usage(&self, query: &UsageQuery) -> Result<Vec<UsageRecord>, ApiError> {
        self.usage_queries.lock().unwrap().push(query.clone());
        self.usage.lock().unwrap().clone()
    }

    async fn fetch_pricing(&self) -> Result<Vec<PricingRecord>, ApiError> {
        self.pricing.lock().unwrap().clone()
    }

    async fn fetch_pipeline_status(&self, limit: u32) -> Result<Vec<PipelineRun>, ApiError> {
        self.pipeline_limits.lock().unwrap().push(limit);
        self.pipeline.lock().unwrap().clone()
    }

    fn invoice_pdf_url(&self, invoice_id: &str) -> Option<String> {
        Some(format!("http://billing-api.test/invoices/{}/pdf", invoice_id))
    }
}

/// Test application wrapper around the router and its fake upstream.
pub struct TestApp {
    pub router: Router,
    pub api: Arc<FakeBillingApi>,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::with_api(FakeBillingApi::default())
    }

    pub fn with_api(api: FakeBillingApi) -> Self {
        init_metrics();

        let api = Arc::new(api);
        let state = AppState::new(
            api.clone(),
            Arc::new(DashboardCache::new(None)),
            PIPELINE_LIMIT,
        );

        Self {
            router: build_router(state),
            api,
        }
    }

    pub async fn request(&self, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.request(Method::GET, uri).await
    }
}

pub fn transport_error() -> ApiError {
    ApiError::Transport("error sending request: connection refused".to_string())
}

pub fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        reason: "Not Found".to_string(),
    }
}

pub fn summary() -> DashboardSummary {
    DashboardSummary {
        total_revenue_mtd: Decimal::new(12345, 1),
        total_customers: Decimal::new(42, 0),
        active_invoices: Decimal::new(7, 0),
        total_events_today: Decimal::new(1234567, 0),
        avg_daily_revenue: Decimal::new(4115, 2),
    }
}

pub fn customer(id: &str, name: &str, status: &str, plan: &str) -> Customer {
    Customer {
        customer_sk: 1,
        customer_id: id.to_string(),
        customer_name: name.to_string(),
        status: status.to_string(),
        country: "US".to_string(),
        plan_id: plan.to_string(),
        is_current: true,
    }
}

pub fn usage(date: &str, product: &str, cost: i64) -> UsageRecord {
    UsageRecord {
        date_id: date.to_string(),
        product_id: product.to_string(),
        unit: "GB".to_string(),
        total_quantity: Decimal::new(cost * 100, 0),
        cost_amount: Decimal::new(cost, 0),
        currency: "USD".to_string(),
    }
}

pub fn invoice(id: &str, status: &str) -> Invoice {
    Invoice {
        invoice_id: id.to_string(),
        customer_sk: 1,
        customer_name: Some("Acme Corp".to_string()),
        billing_period_start: "2024-01-01".to_string(),
        billing_period_end: "2024-01-31".to_string(),
        issued_ts: "2024-02-01T00:00:00".to_string(),
        status: status.to_string(),
        subtotal: Decimal::new(100, 0),
        tax: Decimal::new(20, 0),
        total: Decimal::new(120, 0),
        currency: "USD".to_string(),
    }
}
