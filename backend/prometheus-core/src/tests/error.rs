// Unit tests for error classification helpers

use crate::error::PrometheusError;

/// **VALUE**: Each variant reports a stable kind string.
///
/// **WHY THIS MATTERS**: The dispatch boundary keys its response on `kind()`; renaming one
/// silently breaks every client matching on it.
#[test]
fn given_each_variant_when_kind_called_then_stable_names() {
    assert_eq!(
        PrometheusError::configuration("no url").kind(),
        "configuration_error"
    );
    assert_eq!(
        PrometheusError::from_http_status("query", 503, "").kind(),
        "transport_error"
    );
    assert_eq!(
        PrometheusError::missing_key("query", "result").kind(),
        "response_format_error"
    );
    assert_eq!(
        PrometheusError::upstream("query", Some("boom".into()), None).kind(),
        "upstream_error"
    );
}

/// **VALUE**: HTTP rejections keep the status code and body.
#[test]
fn given_http_status_when_error_created_then_status_and_body_kept() {
    let err = PrometheusError::from_http_status("query", 400, "bad query");

    assert_eq!(err.status_code(), Some(400));
    assert_eq!(err.endpoint(), Some("query"));
    assert_eq!(err.message(), "HTTP 400 - bad query");
    assert!(err.to_string().contains("Transport Error: query: HTTP 400 - bad query"));
}

/// **VALUE**: Configuration errors have no endpoint; the request never got that far.
#[test]
fn given_configuration_error_when_endpoint_called_then_none() {
    let err = PrometheusError::configuration("missing");

    assert_eq!(err.endpoint(), None);
    assert_eq!(err.status_code(), None);
}

/// **VALUE**: Errors record where they were built.
#[test]
fn given_error_when_created_then_location_points_here() {
    let err = PrometheusError::missing_key("targets", "activeTargets");

    assert!(err.location().file.contains("error.rs"));
    assert!(err.message().contains("activeTargets"));
}
