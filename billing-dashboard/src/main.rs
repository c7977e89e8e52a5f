use billing_dashboard::config::get_configuration;
use billing_dashboard::services::api_client::BillingApiClient;
use billing_dashboard::services::cache::DashboardCache;
use billing_dashboard::startup::build_router;
use billing_dashboard::AppState;
use dotenvy::dotenv;
use service_core::observability::logging::init_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("billing-dashboard", &configuration.observability);

    billing_dashboard::services::metrics::init_metrics();

    let client = BillingApiClient::new(&configuration.billing_api).map_err(|e| {
        tracing::error!("Failed to create billing API client: {}", e);
        anyhow::anyhow!("Billing API client error: {}", e)
    })?;
    info!(base_url = %client.base_url(), "Billing API client ready");

    let cache = Arc::new(DashboardCache::new(configuration.cache.stale_after()));
    let state = AppState::new(
        Arc::new(client),
        cache,
        configuration.billing_api.pipeline_limit,
    );

    let app = build_router(state);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting billing-dashboard on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
