//! Error types for the Forecasting API client.

use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors surfaced by a [`ForecastBackend`](super::ForecastBackend).
///
/// The taxonomy mirrors the operation contracts: a backend-reported failure
/// is surfaced verbatim, a transport failure carries a generic network
/// prefix plus the underlying message.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered `success: false` with an error string.
    #[error("{0}")]
    Api(String),
    /// The request threw or could not complete (includes timeouts).
    #[error("Network error: {0}")]
    Network(String),
    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// The client could not be constructed from its configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::BackendError;

    #[test]
    fn test_api_error_displays_verbatim() {
        let err = BackendError::Api("model not found".into());
        assert_eq!(err.to_string(), "model not found");
    }

    #[test]
    fn test_network_error_carries_prefix() {
        let err = BackendError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }
}
