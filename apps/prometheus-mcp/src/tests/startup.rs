// Unit tests for startup configuration checks

use crate::error::McpServerError;
use crate::startup::check_config;

use prometheus_core::{ConfigError, PrometheusConfig};

/// **VALUE**: A valid URL passes the startup check whatever the auth setup.
#[test]
fn given_valid_config_when_checked_then_ok() {
    let plain = PrometheusConfig::new("http://test:9090");
    let basic = PrometheusConfig::new("http://test:9090").with_basic_auth("user", "pass");
    let bearer = PrometheusConfig::new("https://test:9090").with_token("tok").with_org_id("t1");

    assert!(check_config(&plain).is_ok());
    assert!(check_config(&basic).is_ok());
    assert!(check_config(&bearer).is_ok());
}

/// **VALUE**: A missing URL refuses startup.
///
/// **WHY THIS MATTERS**: Serving with no URL would answer every call with a configuration
/// error; failing fast tells the operator immediately.
#[test]
fn given_missing_url_when_checked_then_config_error() {
    let result = check_config(&PrometheusConfig::new(""));

    assert!(matches!(
        result,
        Err(McpServerError::Config(ConfigError::MissingUrl { .. }))
    ));
}

/// **VALUE**: A URL without a scheme refuses startup.
#[test]
fn given_url_without_scheme_when_checked_then_validation_error() {
    let result = check_config(&PrometheusConfig::new("localhost:9090"));

    assert!(matches!(
        result,
        Err(McpServerError::Config(ConfigError::Validation { .. }))
    ));
}
