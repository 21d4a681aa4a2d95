use crate::helpers::{client, client_for, success, upstream_error};

use prometheus_core::{PrometheusConfig, PrometheusError, QueryResult};

use futures_util::future::join_all;
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer};

// ============================================================================
// Operation layer tests: endpoint/param mapping and result reshaping
// ============================================================================

// ----------------------------------------------------------------------------
// execute_query()
// ----------------------------------------------------------------------------

/// **VALUE**: Instant query returns exactly `{resultType, result}` from the payload.
#[tokio::test]
async fn given_vector_payload_when_execute_query_then_returns_query_result() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .and(query_param("query", "up"))
        .and(query_param_is_missing("time"))
        .respond_with(success(json!({"resultType": "vector", "result": []})))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let result = client_for(&server).execute_query("up", None).await.unwrap();

    // THEN
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"resultType": "vector", "result": []})
    );
}

/// **VALUE**: The optional timestamp is forwarded as `time`.
#[tokio::test]
async fn given_time_when_execute_query_then_time_param_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .and(query_param("query", "up"))
        .and(query_param("time", "2023-01-01T00:00:00Z"))
        .respond_with(success(json!({
            "resultType": "vector",
            "result": [{"metric": {"__name__": "up"}, "value": [1617898448.214, "1"]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .execute_query("up", Some("2023-01-01T00:00:00Z"))
        .await
        .unwrap();

    assert_eq!(result.result_type, "vector");
    assert_eq!(result.result.as_array().map(Vec::len), Some(1));
}

/// **VALUE**: An empty timestamp is treated as absent rather than sent as `time=`.
#[tokio::test]
async fn given_empty_time_when_execute_query_then_time_param_omitted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .and(query_param_is_missing("time"))
        .respond_with(success(json!({"resultType": "scalar", "result": [1, "2"]})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).execute_query("1+1", Some("")).await;

    assert!(result.is_ok(), "got {result:?}");
}

/// **VALUE**: A payload without `resultType` is a response format error, not a partial result.
///
/// **BUG THIS CATCHES**: Would catch a default/empty `resultType` being filled in.
#[tokio::test]
async fn given_payload_missing_result_type_when_execute_query_then_response_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(success(json!({"result": []})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .execute_query("up", None)
        .await
        .unwrap_err();

    assert!(matches!(err, PrometheusError::ResponseFormat { .. }));
    assert!(err.message().contains("resultType"));
}

/// **VALUE**: Upstream query errors pass through with their message.
#[tokio::test]
async fn given_error_envelope_when_execute_query_then_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(upstream_error("Test error"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .execute_query("up{", None)
        .await
        .unwrap_err();

    assert!(matches!(err, PrometheusError::Upstream { .. }));
    assert!(err.message().contains("Test error"));
}

// ----------------------------------------------------------------------------
// execute_range_query()
// ----------------------------------------------------------------------------

/// **VALUE**: Range query forwards all four params and returns the matrix.
#[tokio::test]
async fn given_matrix_payload_when_execute_range_query_then_returns_query_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query_range"))
        .and(query_param("query", "up"))
        .and(query_param("start", "2023-01-01T00:00:00Z"))
        .and(query_param("end", "2023-01-01T01:00:00Z"))
        .and(query_param("step", "15s"))
        .respond_with(success(json!({
            "resultType": "matrix",
            "result": [{
                "metric": {"__name__": "up"},
                "values": [[1617898400, "1"], [1617898415, "1"]]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .execute_range_query(
            "up",
            "2023-01-01T00:00:00Z",
            "2023-01-01T01:00:00Z",
            "15s",
        )
        .await
        .unwrap();

    assert_eq!(result.result_type, "matrix");
    assert_eq!(result.result[0]["values"].as_array().map(Vec::len), Some(2));
}

// ----------------------------------------------------------------------------
// list_metrics()
// ----------------------------------------------------------------------------

/// **VALUE**: Metric names come back exactly as listed, in order.
#[tokio::test]
async fn given_metric_names_when_list_metrics_then_same_sequence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/label/__name__/values"))
        .respond_with(success(json!(["up", "go_goroutines", "http_requests_total"])))
        .expect(1)
        .mount(&server)
        .await;

    let metrics = client_for(&server).list_metrics().await.unwrap();

    assert_eq!(metrics, vec!["up", "go_goroutines", "http_requests_total"]);
}

/// **VALUE**: A non-array or non-string payload is a response format error.
#[tokio::test]
async fn given_malformed_names_when_list_metrics_then_response_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(success(json!(["up", 42])))
        .mount(&server)
        .await;

    let err = client_for(&server).list_metrics().await.unwrap_err();

    assert_eq!(err.kind(), "response_format_error");
}

// ----------------------------------------------------------------------------
// get_metric_metadata()
// ----------------------------------------------------------------------------

/// **VALUE**: Metadata forwards `metric` and returns the `metadata` records.
#[tokio::test]
async fn given_metadata_payload_when_get_metric_metadata_then_returns_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/metadata"))
        .and(query_param("metric", "up"))
        .respond_with(success(json!({
            "metadata": [{"metric": "up", "type": "gauge", "help": "Up indicates if the scrape was successful", "unit": ""}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client_for(&server).get_metric_metadata("up").await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["type"], "gauge");
}

/// **VALUE**: A payload without `metadata` is a response format error.
#[tokio::test]
async fn given_payload_missing_metadata_when_get_metric_metadata_then_response_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(success(json!({"up": [{"type": "gauge"}]})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_metric_metadata("up")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "response_format_error");
    assert!(err.message().contains("'metadata'"));
}

// ----------------------------------------------------------------------------
// get_targets()
// ----------------------------------------------------------------------------

/// **VALUE**: Targets returns both active and dropped lists.
#[tokio::test]
async fn given_targets_payload_when_get_targets_then_returns_both_lists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/targets"))
        .respond_with(success(json!({
            "activeTargets": [{"discoveredLabels": {"__address__": "localhost:9090"}, "health": "up"}],
            "droppedTargets": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let targets = client_for(&server).get_targets().await.unwrap();

    assert_eq!(targets.active_targets.len(), 1);
    assert_eq!(targets.active_targets[0]["health"], "up");
    assert!(targets.dropped_targets.is_empty());
}

/// **VALUE**: Missing `droppedTargets` fails the whole operation.
///
/// **WHY THIS MATTERS**: Results are never partially populated.
#[tokio::test]
async fn given_payload_missing_dropped_targets_when_get_targets_then_response_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(success(json!({"activeTargets": []})))
        .mount(&server)
        .await;

    let err = client_for(&server).get_targets().await.unwrap_err();

    assert_eq!(err.kind(), "response_format_error");
    assert!(err.message().contains("droppedTargets"));
}

// ----------------------------------------------------------------------------
// Cross-cutting
// ----------------------------------------------------------------------------

/// **VALUE**: Every operation fails with a configuration error when no URL is configured.
#[tokio::test]
async fn given_empty_base_url_when_any_operation_then_configuration_error() {
    let client = client(PrometheusConfig::new(""));

    let kinds = [
        client.execute_query("up", None).await.unwrap_err().kind(),
        client
            .execute_range_query("up", "0", "1", "1s")
            .await
            .unwrap_err()
            .kind(),
        client.list_metrics().await.unwrap_err().kind(),
        client.get_metric_metadata("up").await.unwrap_err().kind(),
        client.get_targets().await.unwrap_err().kind(),
    ];

    assert!(kinds.iter().all(|kind| *kind == "configuration_error"));
}

/// **VALUE**: Concurrent operations on clones of one client are independent.
///
/// **WHY THIS MATTERS**: The dispatch boundary runs tool calls as concurrent tasks sharing
/// one credential bundle.
///
/// **BUG THIS CATCHES**: Would catch shared mutable state (e.g. a per-client request buffer)
/// mixing up responses.
#[tokio::test]
async fn given_concurrent_queries_when_awaited_then_each_gets_its_own_result() {
    let server = MockServer::start().await;
    for i in 0..8 {
        Mock::given(method("GET"))
            .and(path("/api/v1/query"))
            .and(query_param("query", format!("metric_{i}")))
            .respond_with(success(json!({"resultType": "string", "result": [0, format!("{i}")]})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let calls = (0..8).map(|i| {
        let client = client.clone();
        async move { client.execute_query(&format!("metric_{i}"), None).await }
    });
    let results: Vec<Result<QueryResult, PrometheusError>> = join_all(calls).await;

    for (i, result) in results.into_iter().enumerate() {
        let result = result.unwrap();
        assert_eq!(result.result[1], format!("{i}"));
    }
}
