// Unit tests for envelope parsing and classification

use crate::error::PrometheusError;
use crate::error::prometheus::UNKNOWN_UPSTREAM_ERROR;
use crate::prometheus_client::envelope::Envelope;

use serde_json::json;

/// **VALUE**: A success envelope yields its `data` unchanged.
#[test]
fn given_success_envelope_when_unwrapped_then_returns_data() {
    // GIVEN: A success envelope
    let body = br#"{"status":"success","data":{"resultType":"vector","result":[]}}"#;

    // WHEN: Parsing and unwrapping
    let data = Envelope::parse("query", body)
        .and_then(|envelope| envelope.into_data("query"))
        .unwrap();

    // THEN: The payload is untouched
    assert_eq!(data, json!({"resultType": "vector", "result": []}));
}

/// **VALUE**: `status: "error"` becomes an upstream error carrying the message verbatim.
///
/// **WHY THIS MATTERS**: This is how PromQL syntax errors reach the caller.
#[test]
fn given_error_envelope_when_unwrapped_then_upstream_error_with_message() {
    let body = br#"{"status":"error","errorType":"bad_data","error":"Test error"}"#;

    let result = Envelope::parse("query", body).and_then(|e| e.into_data("query"));

    match result {
        Err(PrometheusError::Upstream {
            message,
            error_type,
            endpoint,
            ..
        }) => {
            assert_eq!(message, "Test error");
            assert_eq!(error_type.as_deref(), Some("bad_data"));
            assert_eq!(endpoint, "query");
        }
        other => panic!("Expected Upstream error, got {other:?}"),
    }
}

/// **VALUE**: An error envelope without an `error` field still gets a message.
#[test]
fn given_error_envelope_without_message_when_unwrapped_then_placeholder() {
    let body = br#"{"status":"error"}"#;

    let err = Envelope::parse("targets", body)
        .and_then(|e| e.into_data("targets"))
        .unwrap_err();

    assert_eq!(err.kind(), "upstream_error");
    assert_eq!(err.message(), UNKNOWN_UPSTREAM_ERROR);
}

/// **VALUE**: Any status other than "success" is an error, even unexpected ones.
///
/// **BUG THIS CATCHES**: Would catch a check written as `status == "error"`.
#[test]
fn given_unexpected_status_when_unwrapped_then_upstream_error() {
    let body = br#"{"status":"partial","data":[]}"#;

    let err = Envelope::parse("query", body)
        .and_then(|e| e.into_data("query"))
        .unwrap_err();

    assert_eq!(err.kind(), "upstream_error");
}

/// **VALUE**: Non-JSON and non-envelope bodies are response format errors.
///
/// **WHY THIS MATTERS**: A misrouted proxy returning HTML must not look like a transport
/// failure or, worse, an empty success.
#[test]
fn given_unparseable_bodies_when_parsed_then_response_format_error() {
    let html = Envelope::parse("query", b"<html>login</html>").unwrap_err();
    let no_status = Envelope::parse("query", br#"{"data":[]}"#).unwrap_err();
    let array = Envelope::parse("query", b"[1,2,3]").unwrap_err();

    assert_eq!(html.kind(), "response_format_error");
    assert_eq!(no_status.kind(), "response_format_error");
    assert_eq!(array.kind(), "response_format_error");
}

/// **VALUE**: A success envelope without `data` is a format error, not a null payload.
#[test]
fn given_success_without_data_when_unwrapped_then_response_format_error() {
    let err = Envelope::parse("query", br#"{"status":"success"}"#)
        .and_then(|e| e.into_data("query"))
        .unwrap_err();

    assert_eq!(err.kind(), "response_format_error");
    assert!(err.message().contains("'data'"));
}

/// **VALUE**: Upstream warnings do not turn a success into a failure.
#[test]
fn given_success_with_warnings_when_unwrapped_then_data_returned() {
    let body = br#"{"status":"success","data":["up"],"warnings":["partial response"]}"#;

    let data = Envelope::parse("label/__name__/values", body)
        .and_then(|e| e.into_data("label/__name__/values"))
        .unwrap();

    assert_eq!(data, json!(["up"]));
}

/// **VALUE**: `"warnings": null` and non-string warnings are tolerated on a success envelope.
///
/// **BUG THIS CATCHES**: Would catch a strict `Vec<String>` turning a valid success response
/// into a response format error.
#[test]
fn given_success_with_null_or_mixed_warnings_when_unwrapped_then_data_returned() {
    // GIVEN: Success envelopes whose warnings are null or not all strings
    let null_warnings = br#"{"status":"success","data":["up"],"warnings":null}"#;
    let mixed_warnings = br#"{"status":"success","data":["up"],"warnings":["slow",{"code":1}]}"#;

    // WHEN: Parsing and unwrapping both
    let first = Envelope::parse("label/__name__/values", null_warnings)
        .and_then(|e| e.into_data("label/__name__/values"));
    let second = Envelope::parse("label/__name__/values", mixed_warnings)
        .and_then(|e| e.into_data("label/__name__/values"));

    // THEN: Both yield the payload
    assert_eq!(first.unwrap(), json!(["up"]));
    assert_eq!(second.unwrap(), json!(["up"]));
}

/// **VALUE**: An error envelope whose `error` is not a string keeps its upstream
/// classification, with the value rendered as the message.
///
/// **BUG THIS CATCHES**: Would catch an `Option<String>` field demoting the upstream failure
/// to a response format error and losing the upstream's explanation.
#[test]
fn given_error_envelope_with_structured_error_when_unwrapped_then_upstream_error() {
    let body = br#"{"status":"error","error":{"msg":"boom"},"errorType":null}"#;

    let err = Envelope::parse("query", body)
        .and_then(|e| e.into_data("query"))
        .unwrap_err();

    assert_eq!(err.kind(), "upstream_error");
    assert_eq!(err.message(), r#"{"msg":"boom"}"#);
    match err {
        PrometheusError::Upstream { error_type, .. } => assert_eq!(error_type, None),
        other => panic!("Expected Upstream error, got {other:?}"),
    }
}

/// **VALUE**: `"error": null` falls back to the placeholder like an absent field.
#[test]
fn given_error_envelope_with_null_error_when_unwrapped_then_placeholder() {
    let err = Envelope::parse("query", br#"{"status":"error","error":null}"#)
        .and_then(|e| e.into_data("query"))
        .unwrap_err();

    assert_eq!(err.message(), UNKNOWN_UPSTREAM_ERROR);
}
