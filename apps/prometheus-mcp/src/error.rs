use common::ErrorLocation;

use prometheus_core::{ConfigError, PrometheusError};

use thiserror::Error;

/// Errors that stop the server process.
///
/// Per-call failures never end up here; they are answered on the wire.
#[derive(Debug, Error)]
pub enum McpServerError {
    /// Startup could not complete (log dir, runtime wiring)
    #[error("Startup Error: {message} {location}")]
    Startup {
        message: String,
        location: ErrorLocation,
    },

    /// Logger could not be installed
    #[error("Logger Error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    /// The MCP handshake failed or the session ended abnormally
    #[error("Session Error: {message} {location}")]
    Session {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Prometheus(#[from] PrometheusError),
}
