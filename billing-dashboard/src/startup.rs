use axum::{
    middleware::from_fn,
    routing::{delete, get},
    Router,
};
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    app::health_check,
    cache::clear_cache,
    metrics::metrics,
    views::{customer_detail, customers, dashboard, invoice, invoices, pipeline, pricing, usage},
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/views/dashboard", get(dashboard))
        .route("/views/usage", get(usage))
        .route("/views/customers", get(customers))
        .route("/views/customers/:customer_id", get(customer_detail))
        .route("/views/invoices", get(invoices))
        .route("/views/invoices/:invoice_id", get(invoice))
        .route("/views/pricing", get(pricing))
        .route("/views/pipeline", get(pipeline))
        .route("/cache", delete(clear_cache));

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(from_fn(metrics_middleware))
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
