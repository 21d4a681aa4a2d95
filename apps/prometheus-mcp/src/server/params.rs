//! MCP tool parameter types.
//!
//! The JSON schemas advertised by `tools/list` are derived from these.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[schemars(description = "Parameters for an instant PromQL query")]
pub struct ExecuteQueryParams {
    #[schemars(description = "PromQL query string")]
    pub query: String,
    #[schemars(description = "Optional RFC3339 or Unix timestamp (default: current time)")]
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[schemars(description = "Parameters for a PromQL range query")]
pub struct ExecuteRangeQueryParams {
    #[schemars(description = "PromQL query string")]
    pub query: String,
    #[schemars(description = "Start time as RFC3339 or Unix timestamp")]
    pub start: String,
    #[schemars(description = "End time as RFC3339 or Unix timestamp")]
    pub end: String,
    #[schemars(description = "Query resolution step width (e.g., '15s', '1m', '1h')")]
    pub step: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[schemars(description = "Parameters for looking up a metric's metadata")]
pub struct MetricMetadataParams {
    #[schemars(description = "The name of the metric to retrieve metadata for")]
    pub metric: String,
}
