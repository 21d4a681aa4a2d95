use prometheus_core::{PrometheusClient, PrometheusConfig};

use serde_json::{Value, json};
use wiremock::{MockServer, ResponseTemplate};

/// 200 response carrying a success envelope around `data`.
pub fn success(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": "success", "data": data}))
}

/// 200 response carrying an error envelope.
pub fn upstream_error(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "error",
        "errorType": "bad_data",
        "error": message
    }))
}

pub fn client(config: PrometheusConfig) -> PrometheusClient {
    PrometheusClient::new(config).expect("client should build")
}

/// Unauthenticated client pointed at the mock server.
pub fn client_for(server: &MockServer) -> PrometheusClient {
    client(PrometheusConfig::new(server.uri()))
}
