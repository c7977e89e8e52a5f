pub mod app;
pub mod cache;
pub mod metrics;
pub mod views;
