//! Shared leaf types for the Prometheus tool workspace.
//!
//! Nothing in here knows about HTTP or Prometheus. The types are used by
//! `prometheus-core` (the request layer) and `prometheus-mcp` (the stdio
//! dispatch app) alike.

pub mod error;
pub mod http_status;
pub mod redacted_secret;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;

#[cfg(test)]
mod tests;
