//! Backend configuration and environment variable handling.

use std::env;
use std::time::Duration;

/// Default public deployment of the forecasting backend.
pub const DEFAULT_BASE_URL: &str =
    "https://bridor-backend-32108269805.europe-west9.run.app/api/forecasting";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Forecasting API configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the forecasting API, without trailing slash.
    pub base_url: String,
    /// Per-request timeout. Expiry is surfaced as a network error.
    pub timeout: Duration,
}

impl BackendConfig {
    /// Create a configuration with the given base URL and default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `FORECAST_API_BASE_URL` (optional): base URL of the forecasting API
    ///   (default: the public deployment)
    /// - `FORECAST_API_TIMEOUT_SECS` (optional, default: 30): request timeout
    ///
    /// # Errors
    /// Returns an error if `FORECAST_API_TIMEOUT_SECS` is set but is not a
    /// positive integer.
    pub fn from_env() -> Result<Self, String> {
        let base_url =
            env::var("FORECAST_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match env::var("FORECAST_API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    format!("FORECAST_API_TIMEOUT_SECS must be a positive integer, got '{raw}'")
                })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
