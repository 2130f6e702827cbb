// src/error.rs

//! Error types for the flight search client.
//!
//! `AppError` covers infrastructure failures (config files, client setup).
//! `ValidationError` and `TransportError` are the pre-flight and network
//! halves of the search taxonomy; neither ever escapes the public client
//! operations, which convert them into result values.

use serde_json::Value;
use thiserror::Error;

/// Result type alias for fallible infrastructure operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Search input rejected before any request is issued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameters: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    #[error("Date must be in YYYY-MM-DD format")]
    InvalidDateFormat,

    #[error("Origin and destination must be different airports")]
    SameAirport,

    #[error("Travel date {date} is before {today}")]
    DateInPast { date: String, today: String },
}

/// Failure of a single upstream call.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// Request deadline elapsed
    #[error("request timed out")]
    Timeout,

    /// Upstream answered with a non-success status
    #[error("upstream returned HTTP {status}")]
    Status { status: u16, body: Option<Value> },

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(String),

    /// A success response whose body is not JSON
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// HTTP status code, if the upstream produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing to the person searching.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { status: 400, .. } => {
                "Invalid search parameters. Please check your inputs.".to_string()
            }
            Self::Status { status: 401, .. } => {
                "API authentication failed. Please check your API key.".to_string()
            }
            Self::Status { status: 403, .. } => {
                "API access forbidden. Check your subscription plan.".to_string()
            }
            Self::Status { status: 429, .. } => {
                "Too many requests. Please wait before trying again.".to_string()
            }
            Self::Status { status, .. } if *status >= 500 => {
                "Server error. Please try again later.".to_string()
            }
            Self::Timeout => "Request timeout. Please check your internet connection.".to_string(),
            other => format!("Error: {other}"),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}
