use crate::AppState;
use axum::{extract::State, http::StatusCode};

/// Drop every cached view so the next read refetches from the billing API.
pub async fn clear_cache(State(state): State<AppState>) -> StatusCode {
    state.cache.clear_all();
    tracing::info!("View cache cleared");
    StatusCode::NO_CONTENT
}
