use prometheus_mcp::server::{PrometheusServer, run};

use prometheus_core::{PrometheusClient, PrometheusConfig};

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{
    AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, duplex, split,
};
use tokio::time::timeout;
use wiremock::matchers::{bearer_token, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// End-to-end: MCP session over an in-memory pipe, mock Prometheus upstream
// ============================================================================

const INVALID_PARAMS: i64 = -32602;

async fn send(writer: &mut (impl AsyncWriteExt + Unpin), message: Value) {
    let mut line = message.to_string();
    line.push('\n');
    writer.write_all(line.as_bytes()).await.unwrap();
    writer.flush().await.unwrap();
}

async fn next_message(lines: &mut Lines<BufReader<ReadHalf<DuplexStream>>>) -> Value {
    let line = timeout(Duration::from_secs(5), lines.next_line())
        .await
        .expect("server answered in time")
        .unwrap()
        .expect("server kept the pipe open");
    serde_json::from_str(&line).unwrap()
}

/// **VALUE**: A full session negotiates, lists tools, answers calls with classified results,
/// and carries credentials and tenant header to the upstream.
///
/// **BUG THIS CATCHES**: Would catch operation failures surfacing as protocol errors instead
/// of error results, and a session that outlives the client hanging up.
#[tokio::test]
async fn given_client_session_when_served_then_every_request_answered() {
    // GIVEN: An authenticated, tenant-scoped upstream
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .and(query_param("query", "up"))
        .and(bearer_token("tok"))
        .and(header("X-Scope-OrgID", "tenant-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"resultType": "vector", "result": []}
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/label/__name__/values"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "error": "Test error"
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let client = PrometheusClient::new(
        PrometheusConfig::new(upstream.uri())
            .with_token("tok")
            .with_org_id("tenant-1"),
    )
    .unwrap();

    let (client_io, server_io) = duplex(64 * 1024);
    let (server_read, server_write) = split(server_io);
    let session = tokio::spawn(run(PrometheusServer::new(client), server_read, server_write));

    let (client_read, mut client_write) = split(client_io);
    let mut lines = BufReader::new(client_read).lines();

    // WHEN: The client performs the handshake
    send(
        &mut client_write,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": {"name": "session-test", "version": "0.0.0"}
            }
        }),
    )
    .await;
    let initialized = next_message(&mut lines).await;

    // THEN: The server negotiates a version and advertises tools
    assert_eq!(initialized["id"], 1);
    assert!(initialized["result"]["protocolVersion"].is_string());
    assert!(initialized["result"]["capabilities"]["tools"].is_object());

    send(
        &mut client_write,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await;

    // WHEN: Listing and calling tools, including bad calls
    let requests = [
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
               "params": {"name": "execute_query", "arguments": {"query": "up"}}}),
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
               "params": {"name": "list_metrics", "arguments": {}}}),
        json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call",
               "params": {"name": "drop_everything", "arguments": {}}}),
        json!({"jsonrpc": "2.0", "id": 6, "method": "tools/call",
               "params": {"name": "execute_range_query", "arguments": {"query": "up"}}}),
    ];
    for request in requests {
        send(&mut client_write, request).await;
    }

    let mut responses = HashMap::new();
    while responses.len() < 5 {
        let message = next_message(&mut lines).await;
        if let Some(id) = message["id"].as_i64() {
            responses.insert(id, message);
        }
    }

    // THEN: Every request is answered
    let tools = responses[&2]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 5);
    assert!(tools.iter().all(|tool| tool["inputSchema"].is_object()));

    let query = &responses[&3]["result"];
    assert_eq!(query["isError"], false);
    let text = query["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload, json!({"resultType": "vector", "result": []}));

    let failed = &responses[&4]["result"];
    assert_eq!(failed["isError"], true);
    assert_eq!(failed["content"][0]["text"], "upstream_error: Test error");

    assert_eq!(responses[&5]["error"]["code"], INVALID_PARAMS);
    assert_eq!(responses[&6]["error"]["code"], INVALID_PARAMS);

    // WHEN: The client hangs up
    client_write.shutdown().await.unwrap();

    // THEN: The session ends cleanly
    timeout(Duration::from_secs(5), session)
        .await
        .expect("session ended in time")
        .unwrap()
        .unwrap();
}

/// **VALUE**: A client that disconnects before the handshake is a session error, not a hang.
#[tokio::test]
async fn given_no_handshake_when_client_disconnects_then_session_error() {
    let client = PrometheusClient::new(PrometheusConfig::new("http://127.0.0.1:1")).unwrap();

    let (client_io, server_io) = duplex(1024);
    let (server_read, server_write) = split(server_io);
    drop(client_io);

    let result = timeout(
        Duration::from_secs(5),
        run(PrometheusServer::new(client), server_read, server_write),
    )
    .await
    .expect("session ended in time");

    assert!(result.is_err());
}
