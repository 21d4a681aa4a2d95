//! Required-key checks on an envelope's `data` payload.

use crate::error::PrometheusError;

use serde_json::{Map, Value};

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn expect_object(
    endpoint: &str,
    data: Value,
) -> Result<Map<String, Value>, PrometheusError> {
    match data {
        Value::Object(map) => Ok(map),
        other => Err(PrometheusError::response_format(
            endpoint,
            format!("expected response data to be an object, got {}", type_name(&other)),
        )),
    }
}

pub(crate) fn expect_array(
    endpoint: &str,
    key: &str,
    value: Value,
) -> Result<Vec<Value>, PrometheusError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(PrometheusError::response_format(
            endpoint,
            format!("expected '{key}' to be an array, got {}", type_name(&other)),
        )),
    }
}

/// Remove `key` from `data`. Absent keys and explicit nulls are both missing.
pub(crate) fn take_key(
    endpoint: &str,
    data: &mut Map<String, Value>,
    key: &str,
) -> Result<Value, PrometheusError> {
    match data.remove(key) {
        Some(Value::Null) | None => Err(PrometheusError::missing_key(endpoint, key)),
        Some(value) => Ok(value),
    }
}

pub(crate) fn take_string(
    endpoint: &str,
    data: &mut Map<String, Value>,
    key: &str,
) -> Result<String, PrometheusError> {
    match take_key(endpoint, data, key)? {
        Value::String(value) => Ok(value),
        other => Err(PrometheusError::response_format(
            endpoint,
            format!("expected '{key}' to be a string, got {}", type_name(&other)),
        )),
    }
}

pub(crate) fn take_array(
    endpoint: &str,
    data: &mut Map<String, Value>,
    key: &str,
) -> Result<Vec<Value>, PrometheusError> {
    let value = take_key(endpoint, data, key)?;
    expect_array(endpoint, key, value)
}
