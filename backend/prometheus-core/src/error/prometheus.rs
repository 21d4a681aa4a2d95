//! Error taxonomy for operations against the Prometheus HTTP API.
//!
//! Every failure an operation can produce is classified into exactly one of
//! four kinds before it leaves this crate:
//!
//! - [`PrometheusError::Configuration`]: no usable base URL, detected before any I/O
//! - [`PrometheusError::Transport`]: network failure or a non-2xx HTTP status
//! - [`PrometheusError::ResponseFormat`]: the body is not an envelope, or `data`
//!   lacks a key the operation needs
//! - [`PrometheusError::Upstream`]: the envelope said `"status": "error"`
//!
//! Raw `reqwest`/`serde_json` errors are converted here and never escape.

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

/// Placeholder used when an error envelope carries no `error` field.
pub const UNKNOWN_UPSTREAM_ERROR: &str = "Unknown error";

pub const TIMEOUT_PREFIX: &str = "request timed out: ";
pub const CONNECTION_PREFIX: &str = "connection failed: ";

#[derive(Debug, ThisError)]
pub enum PrometheusError {
    #[error("Configuration Error: {message} {location}")]
    Configuration {
        message: String,
        location: ErrorLocation,
    },

    #[error("Transport Error: {endpoint}: {message} {location}")]
    Transport {
        endpoint: String,
        message: String,
        status_code: Option<HttpStatusCode>,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("Response Format Error: {endpoint}: {message} {location}")]
    ResponseFormat {
        endpoint: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Upstream Error: {endpoint}: {message} {location}")]
    Upstream {
        endpoint: String,
        message: String,
        error_type: Option<String>,
        location: ErrorLocation,
    },
}

impl PrometheusError {
    #[track_caller]
    pub fn configuration(message: impl Into<String>) -> Self {
        PrometheusError::Configuration {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create from a reqwest error, keeping timeout/connect flags.
    ///
    /// The flags also prefix the message so a caller that only sees the text
    /// can tell a slow server from an unreachable one.
    #[track_caller]
    pub fn from_reqwest(endpoint: impl Into<String>, error: &reqwest::Error) -> Self {
        let is_timeout = error.is_timeout();
        let is_connection = error.is_connect();
        let message = if is_timeout {
            format!("{TIMEOUT_PREFIX}{error}")
        } else if is_connection {
            format!("{CONNECTION_PREFIX}{error}")
        } else {
            error.to_string()
        };

        PrometheusError::Transport {
            endpoint: endpoint.into(),
            message,
            status_code: error.status().map(|s| HttpStatusCode(s.as_u16())),
            is_timeout,
            is_connection,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create from an HTTP response whose status was not 2xx.
    #[track_caller]
    pub fn from_http_status(endpoint: impl Into<String>, status_code: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("HTTP {status_code}")
        } else {
            format!("HTTP {status_code} - {body}")
        };

        PrometheusError::Transport {
            endpoint: endpoint.into(),
            message,
            status_code: Some(HttpStatusCode(status_code)),
            is_timeout: false,
            is_connection: false,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn response_format(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        PrometheusError::ResponseFormat {
            endpoint: endpoint.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn missing_key(endpoint: impl Into<String>, key: &str) -> Self {
        Self::response_format(endpoint, format!("response data is missing required key '{key}'"))
    }

    #[track_caller]
    pub fn upstream(
        endpoint: impl Into<String>,
        message: Option<String>,
        error_type: Option<String>,
    ) -> Self {
        PrometheusError::Upstream {
            endpoint: endpoint.into(),
            message: message.unwrap_or_else(|| UNKNOWN_UPSTREAM_ERROR.to_string()),
            error_type,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Stable machine-readable kind for the dispatch boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            PrometheusError::Configuration { .. } => "configuration_error",
            PrometheusError::Transport { .. } => "transport_error",
            PrometheusError::ResponseFormat { .. } => "response_format_error",
            PrometheusError::Upstream { .. } => "upstream_error",
        }
    }

    /// Human-readable message without the location suffix.
    pub fn message(&self) -> &str {
        match self {
            PrometheusError::Configuration { message, .. }
            | PrometheusError::Transport { message, .. }
            | PrometheusError::ResponseFormat { message, .. }
            | PrometheusError::Upstream { message, .. } => message,
        }
    }

    /// Endpoint the failing request targeted. Configuration errors have none.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            PrometheusError::Configuration { .. } => None,
            PrometheusError::Transport { endpoint, .. }
            | PrometheusError::ResponseFormat { endpoint, .. }
            | PrometheusError::Upstream { endpoint, .. } => Some(endpoint),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            PrometheusError::Transport { status_code, .. } => status_code.map(|s| s.0),
            _ => None,
        }
    }

    pub fn location(&self) -> ErrorLocation {
        match self {
            PrometheusError::Configuration { location, .. }
            | PrometheusError::Transport { location, .. }
            | PrometheusError::ResponseFormat { location, .. }
            | PrometheusError::Upstream { location, .. } => *location,
        }
    }
}
