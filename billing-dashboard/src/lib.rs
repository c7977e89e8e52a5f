pub mod aggregation;
pub mod config;
pub mod format;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod styles;
pub mod views;

use services::api_client::BillingDataSource;
use services::cache::DashboardCache;
use std::sync::Arc;

/// Shared application state: the billing data source and the view caches
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn BillingDataSource>,
    pub cache: Arc<DashboardCache>,
    /// Pipeline runs listed when a request does not ask for a limit.
    pub pipeline_limit: u32,
}

impl AppState {
    pub fn new(
        source: Arc<dyn BillingDataSource>,
        cache: Arc<DashboardCache>,
        pipeline_limit: u32,
    ) -> Self {
        Self {
            source,
            cache,
            pipeline_limit,
        }
    }
}
