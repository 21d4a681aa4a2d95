use crate::error::PrometheusError;

use log::warn;
use serde::Deserialize;
use serde_json::Value;

const SUCCESS_STATUS: &str = "success";

/// The `{status, data, error?}` wrapper around every `/api/v1` response.
///
/// Only `status` is typed strictly. The optional members are kept as raw
/// JSON so a `null` or an oddly shaped value never fails the parse.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Envelope {
    pub status: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub error_type: Option<Value>,
    #[serde(default)]
    pub warnings: Option<Vec<Value>>,
}

impl Envelope {
    pub fn parse(endpoint: &str, body: &[u8]) -> Result<Self, PrometheusError> {
        serde_json::from_slice(body).map_err(|e| {
            PrometheusError::response_format(
                endpoint,
                format!("body is not a Prometheus response envelope: {e}"),
            )
        })
    }

    /// Unwrap the payload, or classify the envelope as an upstream failure.
    pub fn into_data(self, endpoint: &str) -> Result<Value, PrometheusError> {
        for warning in self.warnings.iter().flatten().filter_map(Value::as_str) {
            warn!("Prometheus warning on {endpoint}: {warning}");
        }

        if self.status != SUCCESS_STATUS {
            return Err(PrometheusError::upstream(
                endpoint,
                self.error.and_then(error_text),
                self.error_type.and_then(error_text),
            ));
        }

        self.data
            .ok_or_else(|| PrometheusError::missing_key(endpoint, "data"))
    }
}

/// Strings pass through as-is; any other non-null value is rendered as JSON.
fn error_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}
