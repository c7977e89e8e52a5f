//! Prometheus metrics for billing-dashboard.
//!
//! Dashboard counters live in the `prometheus` default registry. The shared
//! HTTP middleware records through the `metrics` facade, so a Prometheus
//! recorder is installed for it and both are rendered on `/metrics`.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Recorder behind `http_requests_total` and `http_request_duration_seconds`.
static HTTP_METRICS: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Billing API calls by endpoint and outcome (ok, status, transport, decode).
pub static API_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dashboard_api_requests_total",
        "Total number of billing API requests",
        &["endpoint", "outcome"]
    )
    .expect("Failed to register api_requests_total")
});

/// Billing API latency by endpoint.
pub static API_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "dashboard_api_request_duration_seconds",
        "Billing API request duration in seconds",
        &["endpoint"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register api_request_duration")
});

/// View cache events by resource (hit, miss, refetch, stale_discarded, evicted, invalidated).
pub static CACHE_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dashboard_cache_events_total",
        "View cache events by resource",
        &["resource", "event"]
    )
    .expect("Failed to register cache_events_total")
});

/// Views served without data because the billing API failed.
pub static VIEW_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dashboard_view_failures_total",
        "View panels rendered in the error state",
        &["view"]
    )
    .expect("Failed to register view_failures_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&API_REQUESTS_TOTAL);
    Lazy::force(&API_REQUEST_DURATION);
    Lazy::force(&CACHE_EVENTS_TOTAL);
    Lazy::force(&VIEW_FAILURES_TOTAL);

    HTTP_METRICS.get_or_init(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install HTTP metrics recorder");
            None
        }
    });
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut output = encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default();

    if let Some(handle) = HTTP_METRICS.get().and_then(Option::as_ref) {
        output.push_str(&handle.render());
    }
    output
}
