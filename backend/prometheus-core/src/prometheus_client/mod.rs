pub(crate) mod envelope;

use envelope::Envelope;

use crate::auth::{self, AuthMechanism};
use crate::config::PrometheusConfig;
use crate::error::PrometheusError;

use common::HttpStatusCode;

use std::sync::Arc;

use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;
use url::Url;

pub const API_PATH_PREFIX: &str = "api/v1";
pub const ORG_ID_HEADER_KEY: &str = "X-Scope-OrgID";

/// Request executor for the Prometheus `/api/v1` HTTP API.
///
/// Cloning is cheap: the config is shared behind an `Arc` and
/// [`reqwest::Client`] is itself reference counted. Clones can run requests
/// concurrently; nothing here is mutated after construction.
#[derive(Clone)]
pub struct PrometheusClient {
    config: Arc<PrometheusConfig>,
    client: Client,
}

impl PrometheusClient {
    /// Build a client around a config.
    ///
    /// An empty base URL is accepted here; every request then fails with
    /// [`PrometheusError::Configuration`] before touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`PrometheusError::Configuration`] if the HTTP client cannot be
    /// initialized (e.g. no TLS backend).
    pub fn new(config: PrometheusConfig) -> Result<Self, PrometheusError> {
        let config = Arc::new(config);
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                PrometheusError::configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &PrometheusConfig {
        &self.config
    }

    /// GET `<base>/api/v1/<endpoint>` and return the envelope's `data`.
    ///
    /// The payload is returned as-is; interpreting it is the caller's job.
    ///
    /// # Errors
    ///
    /// - [`PrometheusError::Configuration`] - base URL empty or unparseable (no I/O happens)
    /// - [`PrometheusError::Transport`] - network failure or non-2xx status
    /// - [`PrometheusError::ResponseFormat`] - body is not an envelope
    /// - [`PrometheusError::Upstream`] - envelope status is not `"success"`
    pub async fn execute(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, PrometheusError> {
        let url = build_url(self.config.url(), endpoint, params)?;

        let mechanism = auth::resolve(&self.config);
        debug!("GET {} (auth: {})", url.path(), mechanism.describe());

        let mut request = self.client.get(url);
        request = match mechanism {
            AuthMechanism::Bearer { token } => request.bearer_auth(token.expose()),
            AuthMechanism::Basic { username, password } => {
                request.basic_auth(username, Some(password.expose()))
            }
            AuthMechanism::None => request,
        };

        if !self.config.org_id().is_empty() {
            request = request.header(ORG_ID_HEADER_KEY, self.config.org_id());
        }

        let response = request.send().await.map_err(|e| {
            warn!("Request to {endpoint} failed: {e}");
            PrometheusError::from_reqwest(endpoint, &e)
        })?;

        let status = HttpStatusCode(response.status().as_u16());
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Prometheus rejected {endpoint} with HTTP {status}");
            if status.is_auth_rejection() {
                warn!(
                    "Credentials rejected (auth: {}); check PROMETHEUS_TOKEN or PROMETHEUS_USERNAME/PROMETHEUS_PASSWORD",
                    mechanism.describe()
                );
            }
            return Err(PrometheusError::from_http_status(
                endpoint,
                status.0,
                body.trim(),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PrometheusError::from_reqwest(endpoint, &e))?;

        Envelope::parse(endpoint, &body)?.into_data(endpoint)
    }
}

/// Compose `<base without trailing '/'>/api/v1/<endpoint>?<params>`.
///
/// # Errors
///
/// Returns [`PrometheusError::Configuration`] if `base_url` is empty or does
/// not parse as a URL.
pub fn build_url(
    base_url: &str,
    endpoint: &str,
    params: &[(&str, &str)],
) -> Result<Url, PrometheusError> {
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(PrometheusError::configuration(
            "Prometheus URL is not configured. Please set the PROMETHEUS_URL environment variable.",
        ));
    }

    let endpoint = endpoint.trim_start_matches('/');
    let mut url = Url::parse(&format!("{base}/{API_PATH_PREFIX}/{endpoint}")).map_err(|e| {
        PrometheusError::configuration(format!("Invalid Prometheus URL '{base_url}': {e}"))
    })?;

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    Ok(url)
}
