// Unit tests for required-key checks on response payloads

use crate::operations::payload::{expect_array, expect_object, take_array, take_key, take_string};

use serde_json::json;

/// **VALUE**: Present keys are moved out of the payload.
#[test]
fn given_present_keys_when_taken_then_values_returned() {
    let mut data = expect_object("query", json!({"resultType": "vector", "result": [1]})).unwrap();

    assert_eq!(take_string("query", &mut data, "resultType").unwrap(), "vector");
    assert_eq!(take_key("query", &mut data, "result").unwrap(), json!([1]));
    assert!(data.is_empty());
}

/// **VALUE**: Absent and null keys are both reported as missing, by name.
#[test]
fn given_absent_or_null_key_when_taken_then_missing_key_error() {
    let mut data = expect_object("query", json!({"result": null})).unwrap();

    let absent = take_key("query", &mut data, "resultType").unwrap_err();
    let null = take_key("query", &mut data, "result").unwrap_err();

    assert_eq!(absent.kind(), "response_format_error");
    assert!(absent.message().contains("'resultType'"));
    assert!(null.message().contains("'result'"));
}

/// **VALUE**: Wrong JSON types are format errors naming what was found.
#[test]
fn given_wrong_types_when_checked_then_response_format_error() {
    let not_object = expect_object("targets", json!([])).unwrap_err();
    let not_array = expect_array("label/__name__/values", "data", json!({"a": 1})).unwrap_err();
    let mut data = expect_object("targets", json!({"activeTargets": "x"})).unwrap();
    let wrong_field = take_array("targets", &mut data, "activeTargets").unwrap_err();
    let mut data = expect_object("query", json!({"resultType": 3})).unwrap();
    let not_string = take_string("query", &mut data, "resultType").unwrap_err();

    assert!(not_object.message().contains("got array"));
    assert!(not_array.message().contains("got object"));
    assert!(wrong_field.message().contains("got string"));
    assert!(not_string.message().contains("got number"));
}
