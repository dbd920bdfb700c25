use std::sync::Arc;
use std::time::Duration;

use super::config::{http_timeouts, ScoutConfig};

#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    /// Seconds the HTTP client waits for a whole request before giving up.
    pub http_timeout_secs: u64,
    /// File-based config loaded from `post-scout.json` (env-var fallback for all fields).
    pub config: Arc<ScoutConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.config.resolve_backend())
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

impl AppState {
    pub fn new(http_client: reqwest::Client, http_timeout_secs: u64, config: ScoutConfig) -> Self {
        Self {
            http_client,
            http_timeout_secs,
            config: Arc::new(config),
        }
    }

    /// Build state with a bounded HTTP client from `HTTP_TIMEOUT_SECS` /
    /// `HTTP_CONNECT_TIMEOUT_SECS`.
    pub fn from_config(config: ScoutConfig) -> anyhow::Result<Self> {
        let (timeout, connect_timeout) = http_timeouts();
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .build()?;
        Ok(Self::new(http_client, timeout, config))
    }
}
