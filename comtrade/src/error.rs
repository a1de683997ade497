//! Error types for the Comtrade client

use thiserror::Error;

/// Comtrade client error types
#[derive(Error, Debug)]
pub enum ComtradeError {
    /// A parameter setter rejected its value
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter {
        /// Query parameter name
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The API answered with a status of 300 or above
    #[error("HTTP {code}: {reason}")]
    HttpStatus {
        /// Numeric status code
        code: u16,
        /// Reason phrase reported for the status
        reason: String,
    },

    /// The API answered without a body
    #[error("Response contains no content")]
    EmptyBody,

    /// Aggregation or grouping referenced a field no record has
    #[error("Unknown field: {field}")]
    UnknownField {
        /// The field name that was looked up
        field: String,
    },

    /// The response body was not valid JSON for the expected shape
    #[error("JSON decode error: {0}")]
    JsonDecode(#[from] serde_json::Error),

    /// The body decoded but lacks the expected top-level members
    #[error("Malformed response: {reason}")]
    MalformedResponse {
        /// What was missing or wrongly typed
        reason: String,
    },

    /// Connection or protocol failure below the HTTP status level
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// No list of valid values is known for the parameter
    #[error("No known parameter: {name}")]
    UnsupportedParameter {
        /// Query parameter name
        name: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ComtradeError {
    pub(crate) fn invalid_parameter(name: &str, reason: &str) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Type alias for Comtrade results
pub type ComtradeResult<T> = Result<T, ComtradeError>;
