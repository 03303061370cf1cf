//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::services::enrollment::EnrollmentSemantics;

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Root of the external health API, e.g. `http://localhost:8000`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,
    pub templates_dir: String,
    pub secret: String,
    /// Pause before a successful form sends the user on to the next page.
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
    #[serde(default)]
    pub search_debounce_ms: u64,
    #[serde(default)]
    pub enrollment_semantics: EnrollmentSemantics,
}

impl ServerConfig {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_timeout_secs() -> u64 {
    10
}

fn default_redirect_delay_ms() -> u64 {
    1500
}
