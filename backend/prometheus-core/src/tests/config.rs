// Unit tests for credential bundle construction and validation

use crate::config::{
    DEFAULT_TIMEOUT_DURATION, ORG_ID_ENV, PASSWORD_ENV, PrometheusConfig, TIMEOUT_SECS_ENV,
    TOKEN_ENV, URL_ENV, USERNAME_ENV,
};
use crate::error::ConfigError;

use std::collections::HashMap;
use std::env::VarError;
use std::ffi::OsString;
use std::time::Duration;

fn lookup_from(
    vars: &[(&str, &str)],
) -> impl Fn(&str) -> Result<String, VarError> + use<> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned().ok_or(VarError::NotPresent)
}

/// **VALUE**: Every environment variable lands in the matching field.
///
/// **BUG THIS CATCHES**: Would catch a swapped variable name (e.g. token read from
/// PROMETHEUS_PASSWORD) that silently changes the auth mechanism.
#[test]
fn given_all_variables_when_loaded_then_fields_populated() {
    // GIVEN: A full environment
    let lookup = lookup_from(&[
        (URL_ENV, "http://prom:9090"),
        (USERNAME_ENV, "user"),
        (PASSWORD_ENV, "pass"),
        (TOKEN_ENV, "tok"),
        (ORG_ID_ENV, "tenant-1"),
        (TIMEOUT_SECS_ENV, "5"),
    ]);

    // WHEN: Loading
    let config = PrometheusConfig::from_lookup(lookup).unwrap();

    // THEN: Every field is populated
    assert_eq!(config.url(), "http://prom:9090");
    assert_eq!(config.username(), "user");
    assert_eq!(config.password().expose(), "pass");
    assert_eq!(config.token().expose(), "tok");
    assert_eq!(config.org_id(), "tenant-1");
    assert_eq!(config.timeout(), Duration::from_secs(5));
    assert_eq!(config.auth_summary(), "bearer token");
}

/// **VALUE**: Unset variables read as empty rather than failing.
///
/// **WHY THIS MATTERS**: Only the URL is needed; a deployment without credentials must load.
#[test]
fn given_empty_environment_when_loaded_then_defaults() {
    let config = PrometheusConfig::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(config, PrometheusConfig::default());
    assert_eq!(config.timeout(), DEFAULT_TIMEOUT_DURATION);
    assert_eq!(config.auth_summary(), "none");
}

/// **VALUE**: Non-unicode variable values produce a typed error naming the variable.
#[test]
fn given_non_unicode_variable_when_loaded_then_env_var_error() {
    let lookup = |name: &str| {
        if name == TOKEN_ENV {
            Err(VarError::NotUnicode(OsString::from("bad")))
        } else {
            Err(VarError::NotPresent)
        }
    };

    let result = PrometheusConfig::from_lookup(lookup);

    match result {
        Err(ConfigError::EnvVar { variable, .. }) => assert_eq!(variable, TOKEN_ENV),
        other => panic!("Expected EnvVar error, got {other:?}"),
    }
}

/// **VALUE**: A garbage timeout falls back to the default instead of failing startup.
#[test]
fn given_invalid_timeout_when_loaded_then_default_timeout() {
    let zero = PrometheusConfig::from_lookup(lookup_from(&[(TIMEOUT_SECS_ENV, "0")])).unwrap();
    let text = PrometheusConfig::from_lookup(lookup_from(&[(TIMEOUT_SECS_ENV, "soon")])).unwrap();

    assert_eq!(zero.timeout(), DEFAULT_TIMEOUT_DURATION);
    assert_eq!(text.timeout(), DEFAULT_TIMEOUT_DURATION);
}

/// **VALUE**: Startup validation rejects an empty URL with the variable name.
///
/// **WHY THIS MATTERS**: The startup collaborator refuses to serve without a URL; the
/// message must tell the operator which variable to set.
#[test]
fn given_empty_url_when_validated_then_missing_url() {
    let result = PrometheusConfig::new("").validate();

    match result {
        Err(ConfigError::MissingUrl { variable, .. }) => assert_eq!(variable, URL_ENV),
        other => panic!("Expected MissingUrl, got {other:?}"),
    }
}

/// **VALUE**: Non-http URLs are rejected at startup.
#[test]
fn given_non_http_url_when_validated_then_validation_error() {
    let result = PrometheusConfig::new("prometheus:9090").validate();

    assert!(matches!(result, Err(ConfigError::Validation { .. })));
}

/// **VALUE**: Well-formed URLs, with or without trailing slash or path, pass validation.
#[test]
fn given_valid_urls_when_validated_then_ok() {
    assert!(PrometheusConfig::new("http://test:9090").validate().is_ok());
    assert!(PrometheusConfig::new("https://prom.example.com/").validate().is_ok());
    assert!(
        PrometheusConfig::new("https://gateway.example.com/prometheus")
            .validate()
            .is_ok()
    );
}

/// **VALUE**: The bundle's Debug output never contains secrets.
///
/// **BUG THIS CATCHES**: Would catch a plain `String` replacing `RedactedSecret` for the
/// password or token fields.
#[test]
fn given_config_with_secrets_when_debug_formatted_then_secrets_hidden() {
    let config = PrometheusConfig::new("http://test:9090")
        .with_basic_auth("user", "p4ssw0rd")
        .with_token("t0ken");

    let debug = format!("{config:?}");

    assert!(!debug.contains("p4ssw0rd"));
    assert!(!debug.contains("t0ken"));
    assert!(debug.contains("user"));
}
