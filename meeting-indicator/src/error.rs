//! Error taxonomy for an evaluation cycle.
//!
//! `Auth`, `Network` and `Api` abort the current cycle and are reported
//! through the notifier. `MalformedData` never reaches the evaluator; bad
//! events are dropped where they are parsed.

use thiserror::Error;

/// Unified error type for the indicator and its collaborators
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// Token acquisition failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success response from the calendar or user-lookup endpoint
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be understood
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IndicatorError {
    pub fn auth(message: impl Into<String>) -> Self {
        IndicatorError::Auth(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        IndicatorError::Network(message.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        IndicatorError::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a config error for missing env vars
    pub fn missing_env(var_name: &str) -> Self {
        IndicatorError::Config(format!("{} environment variable must be set", var_name))
    }

    /// Short label used in logs and alert titles
    pub fn kind(&self) -> &'static str {
        match self {
            IndicatorError::Auth(_) => "auth",
            IndicatorError::Network(_) => "network",
            IndicatorError::Api { .. } => "api",
            IndicatorError::MalformedData(_) => "malformed_data",
            IndicatorError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for IndicatorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IndicatorError::Network(format!("request timed out: {}", err))
        } else if err.is_decode() {
            IndicatorError::MalformedData(err.to_string())
        } else if let Some(status) = err.status() {
            IndicatorError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            IndicatorError::Network(err.to_string())
        }
    }
}

/// Result type alias for indicator operations
pub type IndicatorResult<T> = Result<T, IndicatorError>;
