//! The five query operations.
//!
//! Each one maps its arguments onto a fixed endpoint, hands the request to
//! [`PrometheusClient::execute`], then reshapes the returned `data` into its
//! own result type. PromQL and timestamps are forwarded untouched; upstream
//! rejects bad ones.
//!
//! The payload contract with Prometheus is not trusted: a missing or
//! mistyped key is a [`PrometheusError::ResponseFormat`], never a panic or a
//! half-filled result.

pub mod payload;

use payload::{expect_array, expect_object, take_array, take_key, take_string};

use crate::error::PrometheusError;
use crate::prometheus_client::PrometheusClient;

use const_format::concatcp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const QUERY_ENDPOINT: &str = "query";
pub const QUERY_RANGE_ENDPOINT: &str = "query_range";
pub const METRIC_NAME_LABEL: &str = "__name__";
pub const LIST_METRICS_ENDPOINT: &str = concatcp!("label/", METRIC_NAME_LABEL, "/values");
pub const METADATA_ENDPOINT: &str = "metadata";
pub const TARGETS_ENDPOINT: &str = "targets";

/// Result of an instant or range query.
///
/// `result` is left as raw JSON: its shape depends on `result_type`
/// (`vector`, `matrix`, `scalar`, `string`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub result_type: String,
    pub result: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetsResult {
    pub active_targets: Vec<Value>,
    pub dropped_targets: Vec<Value>,
}

/// One metadata entry (`type`, `help`, `unit`, ...) as returned upstream.
pub type MetadataRecord = Value;

impl PrometheusClient {
    /// Instant query at `time`, or at upstream's "now" when `time` is absent or empty.
    pub async fn execute_query(
        &self,
        query: &str,
        time: Option<&str>,
    ) -> Result<QueryResult, PrometheusError> {
        let mut params = vec![("query", query)];
        if let Some(time) = time.filter(|t| !t.is_empty()) {
            params.push(("time", time));
        }

        let data = self.execute(QUERY_ENDPOINT, &params).await?;
        query_result(QUERY_ENDPOINT, data)
    }

    pub async fn execute_range_query(
        &self,
        query: &str,
        start: &str,
        end: &str,
        step: &str,
    ) -> Result<QueryResult, PrometheusError> {
        let params = [
            ("query", query),
            ("start", start),
            ("end", end),
            ("step", step),
        ];

        let data = self.execute(QUERY_RANGE_ENDPOINT, &params).await?;
        query_result(QUERY_RANGE_ENDPOINT, data)
    }

    /// All metric names, in the order upstream returned them.
    pub async fn list_metrics(&self) -> Result<Vec<String>, PrometheusError> {
        let data = self.execute(LIST_METRICS_ENDPOINT, &[]).await?;

        expect_array(LIST_METRICS_ENDPOINT, "data", data)?
            .into_iter()
            .map(|name| match name {
                Value::String(name) => Ok(name),
                other => Err(PrometheusError::response_format(
                    LIST_METRICS_ENDPOINT,
                    format!("metric name is not a string: {other}"),
                )),
            })
            .collect()
    }

    pub async fn get_metric_metadata(
        &self,
        metric: &str,
    ) -> Result<Vec<MetadataRecord>, PrometheusError> {
        let data = self
            .execute(METADATA_ENDPOINT, &[("metric", metric)])
            .await?;

        let mut data = expect_object(METADATA_ENDPOINT, data)?;
        take_array(METADATA_ENDPOINT, &mut data, "metadata")
    }

    pub async fn get_targets(&self) -> Result<TargetsResult, PrometheusError> {
        let data = self.execute(TARGETS_ENDPOINT, &[]).await?;

        let mut data = expect_object(TARGETS_ENDPOINT, data)?;
        Ok(TargetsResult {
            active_targets: take_array(TARGETS_ENDPOINT, &mut data, "activeTargets")?,
            dropped_targets: take_array(TARGETS_ENDPOINT, &mut data, "droppedTargets")?,
        })
    }
}

fn query_result(endpoint: &str, data: Value) -> Result<QueryResult, PrometheusError> {
    let mut data = expect_object(endpoint, data)?;
    Ok(QueryResult {
        result_type: take_string(endpoint, &mut data, "resultType")?,
        result: take_key(endpoint, &mut data, "result")?,
    })
}
