//! Remote data source: the billing API over HTTP/JSON.

use crate::config::BillingApiSettings;
use crate::models::{
    Customer, DashboardSummary, Invoice, InvoiceDetail, PipelineRun, PricingRecord, UsageRecord,
};
use crate::services::metrics::{API_REQUESTS_TOTAL, API_REQUEST_DURATION};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;
use std::time::Instant;
use thiserror::Error;

/// Why a fetch produced no records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The API could not be reached or the connection broke mid-response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-2xx status.
    #[error("API error: {status} {reason}")]
    Status { status: u16, reason: String },

    /// The body did not have the expected record shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The request could not be built (bad base URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Transport failures and error statuses may succeed on retry; malformed
    /// records will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Status { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    fn outcome(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "transport",
            ApiError::Status { .. } => "status",
            ApiError::Decode(_) => "decode",
            ApiError::InvalidRequest(_) => "invalid_request",
        }
    }
}

/// Server-side filters for `/usage`. Blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl UsageQuery {
    pub fn normalized(self) -> Self {
        Self {
            date_from: non_blank(self.date_from),
            date_to: non_blank(self.date_to),
            product_id: non_blank(self.product_id),
            customer_id: non_blank(self.customer_id),
        }
    }
}

/// Server-side filters for `/invoices`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl InvoiceQuery {
    pub fn normalized(self) -> Self {
        Self {
            customer_id: non_blank(self.customer_id),
            status: non_blank(self.status),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "all")
}

/// One typed fetch per record family.
#[async_trait]
pub trait BillingDataSource: Send + Sync {
    async fn fetch_dashboard_summary(&self) -> Result<DashboardSummary, ApiError>;

    async fn fetch_customers(&self) -> Result<Vec<Customer>, ApiError>;

    async fn fetch_customer_usage(&self, customer_id: &str) -> Result<Vec<UsageRecord>, ApiError>;

    async fn fetch_invoices(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>, ApiError>;

    async fn fetch_invoice_detail(&self, invoice_id: &str) -> Result<InvoiceDetail, ApiError>;

    async fn fetch_usage(&self, query: &UsageQuery) -> Result<Vec<UsageRecord>, ApiError>;

    async fn fetch_pricing(&self) -> Result<Vec<PricingRecord>, ApiError>;

    async fn fetch_pipeline_status(&self, limit: u32) -> Result<Vec<PipelineRun>, ApiError>;

    /// Link to the rendered PDF of an invoice, served by the API directly.
    fn invoice_pdf_url(&self, _invoice_id: &str) -> Option<String> {
        None
    }
}

/// reqwest-backed [`BillingDataSource`].
pub struct BillingApiClient {
    client: Client,
    base_url: Url,
}

impl BillingApiClient {
    pub fn new(settings: &BillingApiSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("{}: {}", settings.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "{} cannot be used as a base URL",
                settings.base_url
            )));
        }

        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidRequest("base URL has no path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T, Q>(
        &self,
        endpoint: &'static str,
        url: Url,
        query: &Q,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let start = Instant::now();
        let result = self.send(url, query).await;

        API_REQUEST_DURATION
            .with_label_values(&[endpoint])
            .observe(start.elapsed().as_secs_f64());

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.outcome(),
        };
        API_REQUESTS_TOTAL
            .with_label_values(&[endpoint, outcome])
            .inc();

        result
    }

    async fn send<T, Q>(&self, url: Url, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .client
            .traced_get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Billing API request failed");
                ApiError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                "Billing API returned error status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Failed to read billing API response");
            ApiError::Transport(e.to_string())
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(url = %url, error = %e, "Billing API response has unexpected shape");
            ApiError::Decode(e.to_string())
        })
    }
}

const NO_QUERY: &[(&str, &str)] = &[];

#[async_trait]
impl BillingDataSource for BillingApiClient {
    async fn fetch_dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        let url = self.endpoint(&["dashboard", "summary"])?;
        self.get_json("dashboard_summary", url, NO_QUERY).await
    }

    async fn fetch_customers(&self) -> Result<Vec<Customer>, ApiError> {
        let url = self.endpoint(&["customers"])?;
        self.get_json("customers", url, NO_QUERY).await
    }

    async fn fetch_customer_usage(&self, customer_id: &str) -> Result<Vec<UsageRecord>, ApiError> {
        let url = self.endpoint(&["customers", customer_id, "usage"])?;
        self.get_json("customer_usage", url, NO_QUERY).await
    }

    async fn fetch_invoices(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>, ApiError> {
        let url = self.endpoint(&["invoices"])?;
        self.get_json("invoices", url, query).await
    }

    async fn fetch_invoice_detail(&self, invoice_id: &str) -> Result<InvoiceDetail, ApiError> {
        let url = self.endpoint(&["invoices", invoice_id])?;
        self.get_json("invoice_detail", url, NO_QUERY).await
    }

    async fn fetch_usage(&self, query: &UsageQuery) -> Result<Vec<UsageRecord>, ApiError> {
        let url = self.endpoint(&["usage"])?;
        self.get_json("usage", url, query).await
    }

    async fn fetch_pricing(&self) -> Result<Vec<PricingRecord>, ApiError> {
        let url = self.endpoint(&["pricing"])?;
        self.get_json("pricing", url, NO_QUERY).await
    }

    async fn fetch_pipeline_status(&self, limit: u32) -> Result<Vec<PipelineRun>, ApiError> {
        let url = self.endpoint(&["pipeline", "status"])?;
        self.get_json("pipeline_status", url, &[("limit", limit)]).await
    }

    fn invoice_pdf_url(&self, invoice_id: &str) -> Option<String> {
        self.endpoint(&["invoices", invoice_id, "pdf"])
            .ok()
            .map(String::from)
    }
}
