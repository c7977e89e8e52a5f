//! View endpoints. Each one loads its record families through the cache,
//! concurrently where a page needs several, and renders every panel on its
//! own so one failed fetch never blanks the whole page.
//!
//! Every endpoint accepts `refresh=true` to bypass fresh cache entries.

use crate::aggregation::Selection;
use crate::models::Customer;
use crate::services::api_client::{ApiError, InvoiceQuery, UsageQuery};
use crate::services::cache::Snapshot;
use crate::services::metrics::VIEW_FAILURES_TOTAL;
use crate::views::customers::{
    customer_cards, customer_daily_cost, customer_products, empty_message, find_customer,
    CustomerCard, CustomerDetailView, CustomerListView, NO_CUSTOMER_USAGE, NO_PRODUCT_USAGE,
};
use crate::views::dashboard::{
    kpi_cards, recent_invoices, revenue_series, usage_by_product, DashboardView,
};
use crate::views::invoices::{
    customer_options, invoice_detail, invoice_rows, InvoiceListView, INVOICE_STATUSES, NO_INVOICES,
};
use crate::views::pipeline::{pipeline_rows, NO_RUNS};
use crate::views::pricing::{pricing_view, NO_PRICING};
use crate::views::usage::{usage_explorer, NO_USAGE};
use crate::views::panel;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct RefreshParams {
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UsageParams {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub customer_id: Option<String>,
    /// Applied to the fetched records, not sent upstream.
    pub product_id: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomerParams {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceParams {
    pub status: Option<String>,
    pub customer_id: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PipelineParams {
    pub limit: Option<u32>,
    #[serde(default)]
    pub refresh: bool,
}

/// 502 when the page's primary panel has nothing to show but an error.
fn respond<T: Serialize>(view: T, failed: bool) -> Response {
    let status = if failed {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    (status, Json(view)).into_response()
}

#[tracing::instrument(name = "dashboard_view", skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<RefreshParams>,
) -> Json<DashboardView> {
    let source = state.source.as_ref();
    let cache = &state.cache;
    let usage_query = UsageQuery::default();
    let invoice_query = InvoiceQuery::default();

    let (summary, usage, invoices) = tokio::join!(
        cache
            .summary
            .load((), params.refresh, || source.fetch_dashboard_summary()),
        cache.usage.load(usage_query.clone(), params.refresh, || {
            source.fetch_usage(&usage_query)
        }),
        cache.invoices.load(invoice_query.clone(), params.refresh, || {
            source.fetch_invoices(&invoice_query)
        }),
    );

    Json(DashboardView {
        kpis: panel("dashboard", &summary, "No summary available", kpi_cards),
        revenue: panel("dashboard", &usage, "No revenue data available", |u| {
            revenue_series(u)
        }),
        usage_by_product: panel("dashboard", &usage, "No usage data available", |u| {
            usage_by_product(u)
        }),
        recent_invoices: panel("dashboard", &invoices, NO_INVOICES, |i| recent_invoices(i)),
    })
}

#[tracing::instrument(name = "usage_view", skip(state))]
pub async fn usage(State(state): State<AppState>, Query(params): Query<UsageParams>) -> Response {
    let source = state.source.as_ref();
    let query = UsageQuery {
        date_from: params.date_from,
        date_to: params.date_to,
        customer_id: params.customer_id,
        product_id: None,
    }
    .normalized();
    let product = Selection::from_param(params.product_id.as_deref());

    let records = state
        .cache
        .usage
        .load(query.clone(), params.refresh, || source.fetch_usage(&query))
        .await;

    panel("usage", &records, NO_USAGE, |r| usage_explorer(r, &product)).into_response()
}

#[tracing::instrument(name = "customers_view", skip(state))]
pub async fn customers(
    State(state): State<AppState>,
    Query(params): Query<CustomerParams>,
) -> Response {
    let source = state.source.as_ref();
    let records = state
        .cache
        .customers
        .load((), params.refresh, || source.fetch_customers())
        .await;

    let search = params.search.trim().to_string();
    let cards = panel("customers", &records, empty_message(&search), |c| {
        customer_cards(c, &search)
    });
    let failed = cards.is_error();

    respond(
        CustomerListView {
            search,
            customers: cards,
        },
        failed,
    )
}

#[tracing::instrument(name = "customer_detail_view", skip(state))]
pub async fn customer_detail(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Query(params): Query<RefreshParams>,
) -> Result<Response, AppError> {
    let source = state.source.as_ref();
    let cache = &state.cache;

    let (customers, usage) = tokio::join!(
        cache
            .customers
            .load((), params.refresh, || source.fetch_customers()),
        cache
            .customer_usage
            .load(customer_id.clone(), params.refresh, || {
                source.fetch_customer_usage(&customer_id)
            }),
    );

    let card = customer_card(&customers, &customer_id)?;

    Ok(Json(CustomerDetailView {
        customer: card,
        daily_cost: panel("customer_detail", &usage, NO_CUSTOMER_USAGE, |u| {
            customer_daily_cost(u)
        }),
        products: panel("customer_detail", &usage, NO_PRODUCT_USAGE, |u| {
            customer_products(u)
        }),
    })
    .into_response())
}

/// The page header needs the customer record itself, so a failed customer
/// load fails the whole page rather than one panel.
fn customer_card(
    customers: &Snapshot<Vec<Customer>>,
    customer_id: &str,
) -> Result<CustomerCard, AppError> {
    match (&customers.data, &customers.error) {
        (Some(all), _) => find_customer(all, customer_id)
            .map(CustomerCard::from_customer)
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Customer {} not found", customer_id))
            }),
        (None, Some(error)) => Err(upstream_failure("customer_detail", error)),
        (None, None) => Err(AppError::NotFound(anyhow::anyhow!(
            "Customer {} not found",
            customer_id
        ))),
    }
}

fn upstream_failure(view: &str, error: &ApiError) -> AppError {
    VIEW_FAILURES_TOTAL.with_label_values(&[view]).inc();
    AppError::bad_gateway(error.to_string(), error.is_retryable())
}

#[tracing::instrument(name = "invoices_view", skip(state))]
pub async fn invoices(
    State(state): State<AppState>,
    Query(params): Query<InvoiceParams>,
) -> Response {
    let source = state.source.as_ref();
    let cache = &state.cache;
    let status = Selection::from_param(params.status.as_deref());
    let customer = Selection::from_param(params.customer_id.as_deref());
    let query = InvoiceQuery {
        customer_id: customer.as_param().map(str::to_string),
        status: status.as_param().map(str::to_string),
    }
    .normalized();

    let (records, customers) = tokio::join!(
        cache
            .invoices
            .load(query.clone(), params.refresh, || source.fetch_invoices(&query)),
        cache
            .customers
            .load((), params.refresh, || source.fetch_customers()),
    );

    let rows = panel("invoices", &records, NO_INVOICES, |i| invoice_rows(i));
    let failed = rows.is_error();

    respond(
        InvoiceListView {
            status,
            customer,
            statuses: INVOICE_STATUSES,
            customers: customers
                .data
                .as_deref()
                .map(|c| customer_options(c))
                .unwrap_or_default(),
            invoices: rows,
        },
        failed,
    )
}

#[tracing::instrument(name = "invoice_detail_view", skip(state))]
pub async fn invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
    Query(params): Query<RefreshParams>,
) -> Result<Response, AppError> {
    let source = state.source.as_ref();
    let detail = state
        .cache
        .invoice_detail
        .load(invoice_id.clone(), params.refresh, || {
            source.fetch_invoice_detail(&invoice_id)
        })
        .await;

    if detail.data.is_none() {
        match &detail.error {
            Some(error) if error.is_not_found() => {
                return Err(AppError::NotFound(anyhow::anyhow!("Invoice not found")));
            }
            Some(error) => return Err(upstream_failure("invoice_detail", error)),
            None => {}
        }
    }

    let pdf_url = source.invoice_pdf_url(&invoice_id);
    Ok(panel("invoice_detail", &detail, "Invoice not found", |d| {
        invoice_detail(d, pdf_url)
    })
    .into_response())
}

#[tracing::instrument(name = "pricing_view", skip(state))]
pub async fn pricing(
    State(state): State<AppState>,
    Query(params): Query<RefreshParams>,
) -> Response {
    let source = state.source.as_ref();
    let records = state
        .cache
        .pricing
        .load((), params.refresh, || source.fetch_pricing())
        .await;

    panel("pricing", &records, NO_PRICING, |p| pricing_view(p)).into_response()
}

#[tracing::instrument(name = "pipeline_view", skip(state))]
pub async fn pipeline(
    State(state): State<AppState>,
    Query(params): Query<PipelineParams>,
) -> Response {
    let source = state.source.as_ref();
    let limit = params
        .limit
        .filter(|limit| *limit > 0)
        .unwrap_or(state.pipeline_limit);

    let runs = state
        .cache
        .pipeline
        .load(limit, params.refresh, || source.fetch_pipeline_status(limit))
        .await;

    panel("pipeline", &runs, NO_RUNS, |r| pipeline_rows(r)).into_response()
}
