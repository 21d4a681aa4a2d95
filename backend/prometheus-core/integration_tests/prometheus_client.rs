use crate::helpers::{client, client_for, success, upstream_error};

use prometheus_core::error::prometheus::{CONNECTION_PREFIX, TIMEOUT_PREFIX};
use prometheus_core::{ORG_ID_HEADER_KEY, PrometheusConfig, PrometheusError};

use std::net::TcpListener;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{basic_auth, bearer_token, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Request executor tests against a mock Prometheus
// ============================================================================

// ----------------------------------------------------------------------------
// Request shape: path, params, auth, tenant header
// ----------------------------------------------------------------------------

/// **VALUE**: The executor issues a GET to `/api/v1/<endpoint>` with the params as a query
/// string and returns `data` untouched.
///
/// **BUG THIS CATCHES**: Would catch a POST, a wrong path prefix, or the envelope leaking
/// into the returned payload.
#[tokio::test]
async fn given_success_envelope_when_executed_then_returns_data() {
    // GIVEN: A mock Prometheus answering /api/v1/query?query=up
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .and(query_param("query", "up"))
        .respond_with(success(json!({"resultType": "vector", "result": []})))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Executing
    let data = client_for(&server)
        .execute("query", &[("query", "up")])
        .await
        .unwrap();

    // THEN: The raw payload comes back
    assert_eq!(data, json!({"resultType": "vector", "result": []}));
}

/// **VALUE**: A trailing slash on the configured URL does not produce `//api/v1`.
#[tokio::test]
async fn given_base_url_with_trailing_slash_when_executed_then_path_has_single_slash() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/targets"))
        .respond_with(success(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(PrometheusConfig::new(format!("{}/", server.uri())));
    let result = client.execute("targets", &[]).await;

    assert!(result.is_ok(), "got {result:?}");
}

/// **VALUE**: A configured token is sent as `Authorization: Bearer <token>`.
#[tokio::test]
async fn given_token_when_executed_then_bearer_header_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .and(bearer_token("secret-token"))
        .respond_with(success(json!({"resultType": "scalar", "result": [0, "1"]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(PrometheusConfig::new(server.uri()).with_token("secret-token"));
    let result = client.execute("query", &[("query", "1")]).await;

    assert!(result.is_ok(), "got {result:?}");
}

/// **VALUE**: Token beats basic auth; only the bearer credential goes on the wire.
///
/// **WHY THIS MATTERS**: At most one mechanism may be active per request.
///
/// **BUG THIS CATCHES**: Would catch both mechanisms being applied (the second silently
/// overwriting the first Authorization header).
#[tokio::test]
async fn given_token_and_basic_pair_when_executed_then_only_bearer_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(success(json!([])))
        .mount(&server)
        .await;

    let config = PrometheusConfig::new(server.uri())
        .with_basic_auth("user", "pass")
        .with_token("tok");
    client(config)
        .execute("label/__name__/values", &[])
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let authorization: Vec<_> = requests[0].headers.get_all("authorization").iter().collect();
    assert_eq!(authorization.len(), 1, "exactly one Authorization header");
    assert_eq!(authorization[0], "Bearer tok");
}

/// **VALUE**: A username/password pair is sent as HTTP basic auth.
#[tokio::test]
async fn given_basic_pair_when_executed_then_basic_auth_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/targets"))
        .and(basic_auth("user", "pass"))
        .respond_with(success(json!({"activeTargets": [], "droppedTargets": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(PrometheusConfig::new(server.uri()).with_basic_auth("user", "pass"));
    let result = client.execute("targets", &[]).await;

    assert!(result.is_ok(), "got {result:?}");
}

/// **VALUE**: Partial credentials send no Authorization header at all.
#[tokio::test]
async fn given_only_username_when_executed_then_no_credentials_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(success(json!([])))
        .mount(&server)
        .await;

    let client = client(PrometheusConfig::new(server.uri()).with_basic_auth("user", ""));
    client.execute("label/__name__/values", &[]).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));
}

/// **VALUE**: The tenant header is sent with every auth mechanism.
///
/// **WHY THIS MATTERS**: Multi-tenant backends (Cortex, Mimir, Thanos) return another
/// tenant's data, or nothing, when the header is dropped.
///
/// **BUG THIS CATCHES**: Would catch the header being added only on one auth branch.
#[tokio::test]
async fn given_org_id_when_executed_with_any_auth_then_scope_header_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header(ORG_ID_HEADER_KEY, "tenant-1"))
        .respond_with(success(json!([])))
        .expect(3)
        .mount(&server)
        .await;

    let configs = [
        PrometheusConfig::new(server.uri()).with_org_id("tenant-1"),
        PrometheusConfig::new(server.uri())
            .with_org_id("tenant-1")
            .with_basic_auth("user", "pass"),
        PrometheusConfig::new(server.uri())
            .with_org_id("tenant-1")
            .with_token("tok"),
    ];

    for config in configs {
        let result = client(config).execute("label/__name__/values", &[]).await;
        assert!(result.is_ok(), "got {result:?}");
    }
}

/// **VALUE**: Without a tenant id, no scoping header is sent.
#[tokio::test]
async fn given_no_org_id_when_executed_then_no_scope_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(success(json!([])))
        .mount(&server)
        .await;

    client_for(&server)
        .execute("label/__name__/values", &[])
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("x-scope-orgid"));
}

// ----------------------------------------------------------------------------
// Error classification
// ----------------------------------------------------------------------------

/// **VALUE**: An empty base URL fails with a configuration error and never hits the network.
///
/// **BUG THIS CATCHES**: Would catch the URL check moving after the request is built, e.g. a
/// request to `/api/v1/query` relative to some default host.
#[tokio::test]
async fn given_empty_base_url_when_executed_then_configuration_error_without_io() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(success(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(PrometheusConfig::new("").with_token("tok").with_org_id("t"));
    let err = client.execute("query", &[("query", "up")]).await.unwrap_err();

    assert!(matches!(err, PrometheusError::Configuration { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// **VALUE**: `status: "error"` on HTTP 200 is an upstream error with the upstream message.
#[tokio::test]
async fn given_error_envelope_when_executed_then_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(upstream_error("Test error"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .execute("query", &[("query", "up")])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "upstream_error");
    assert!(err.to_string().contains("Test error"));
}

/// **VALUE**: Non-2xx responses are transport errors carrying the status code, even when the
/// body is an error envelope.
#[tokio::test]
async fn given_http_400_with_error_envelope_when_executed_then_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "errorType": "bad_data",
            "error": "parse error at char 4"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .execute("query", &[("query", "up{")])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "transport_error");
    assert_eq!(err.status_code(), Some(400));
    assert_eq!(err.endpoint(), Some("query"));
    assert!(err.message().contains("parse error at char 4"));
}

/// **VALUE**: 401 from rejected credentials is a transport error with the status.
#[tokio::test]
async fn given_http_401_when_executed_then_transport_error_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .execute("targets", &[])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "transport_error");
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.message(), "HTTP 401");
}

/// **VALUE**: A non-JSON 200 body is a response format error.
#[tokio::test]
async fn given_html_body_when_executed_then_response_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>sign in</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .execute("query", &[("query", "up")])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "response_format_error");
}

/// **VALUE**: Connection refused is a transport error flagged as a connection failure.
#[tokio::test]
async fn given_unreachable_server_when_executed_then_transport_error() {
    // GIVEN: A port that was bound and released, so nothing listens on it
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(PrometheusConfig::new(uri))
        .execute("query", &[("query", "up")])
        .await
        .unwrap_err();

    match err {
        PrometheusError::Transport {
            ref message,
            status_code,
            is_connection,
            ..
        } => {
            assert_eq!(status_code, None);
            assert!(is_connection, "should be flagged as a connection failure");
            assert!(message.starts_with(CONNECTION_PREFIX), "got: {message}");
        }
        other => panic!("Expected Transport error, got {other:?}"),
    }
}

/// **VALUE**: The configured timeout bounds a slow upstream.
#[tokio::test]
async fn given_slow_server_when_executed_then_transport_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(success(json!([])).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = PrometheusConfig::new(server.uri()).with_timeout(Duration::from_millis(100));
    let err = client(config).execute("targets", &[]).await.unwrap_err();

    match err {
        PrometheusError::Transport {
            ref message,
            is_timeout,
            ..
        } => {
            assert!(is_timeout);
            assert!(message.starts_with(TIMEOUT_PREFIX), "got: {message}");
        }
        other => panic!("Expected Transport timeout, got {other:?}"),
    }
}
