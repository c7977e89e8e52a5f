use serde::Deserialize;
use service_core::config::{configuration_directory, load_settings, ObservabilitySettings};
use service_core::error::AppError;
use std::time::Duration;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub billing_api: BillingApiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BillingApiSettings {
    /// Base URL of the billing API every record family is fetched from.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Number of pipeline runs shown when the caller does not ask for a limit.
    #[serde(default = "default_pipeline_limit")]
    pub pipeline_limit: u32,
}

impl BillingApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for BillingApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            pipeline_limit: default_pipeline_limit(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_pipeline_limit() -> u32 {
    20
}

#[derive(Deserialize, Clone, Debug)]
pub struct CacheSettings {
    /// Cached views older than this are refetched on the next read.
    /// Zero keeps entries until they are invalidated explicitly.
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
}

impl CacheSettings {
    pub fn stale_after(&self) -> Option<Duration> {
        (self.stale_after_secs > 0).then(|| Duration::from_secs(self.stale_after_secs))
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            stale_after_secs: default_stale_after_secs(),
        }
    }
}

fn default_stale_after_secs() -> u64 {
    30
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let directory = configuration_directory("billing-dashboard")?;
    load_settings(&directory)
}
