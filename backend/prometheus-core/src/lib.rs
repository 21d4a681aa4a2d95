//! Authenticated access to the Prometheus query API.
//!
//! ## Layers
//!
//! - [`auth`]: picks bearer, basic or no auth from the credential bundle
//! - [`PrometheusClient::execute`]: URL composition, auth wiring, tenant header,
//!   envelope validation and error classification
//! - [`operations`]: instant query, range query, list metrics, metric metadata,
//!   target status
//!
//! Every failure leaves as a [`PrometheusError`].

pub mod auth;
pub mod config;
pub mod error;
pub mod operations;

mod prometheus_client;
#[cfg(test)]
mod tests;

pub use config::PrometheusConfig;
pub use error::{ConfigError, PrometheusError};
pub use operations::{MetadataRecord, QueryResult, TargetsResult};
pub use prometheus_client::{API_PATH_PREFIX, ORG_ID_HEADER_KEY, PrometheusClient, build_url};
