//! MCP server exposing the Prometheus operations as tools.
//!
//! # Tools
//!
//! - `execute_query` - instant PromQL query
//! - `execute_range_query` - PromQL query over a time range
//! - `list_metrics` - every metric name Prometheus knows
//! - `get_metric_metadata` - metadata records for one metric
//! - `get_targets` - active and dropped scrape targets
//!
//! Operation failures come back as a tool result with `isError: true` and a
//! `"<kind>: <message>"` text. Bad arguments and unknown tool names are
//! protocol errors answered by the router. Every call shares one
//! [`PrometheusClient`] and nothing else.

mod params;

pub use params::{ExecuteQueryParams, ExecuteRangeQueryParams, MetricMetadataParams};

use crate::error::McpServerError;

use common::ErrorLocation;

use prometheus_core::{PrometheusClient, PrometheusError};

use std::panic::Location;

use log::{debug, info, warn};
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite};

const INSTRUCTIONS: &str = "Query a Prometheus server with PromQL.\n\n\
    Use list_metrics to discover metric names, get_metric_metadata to learn what \
    a metric measures, then execute_query or execute_range_query to read values. \
    get_targets shows which scrape targets are up.";

#[derive(Clone)]
pub struct PrometheusServer {
    client: PrometheusClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PrometheusServer {
    pub fn new(client: PrometheusClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Execute a PromQL instant query against Prometheus")]
    pub async fn execute_query(
        &self,
        Parameters(params): Parameters<ExecuteQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .client
            .execute_query(&params.query, params.time.as_deref())
            .await;
        respond("execute_query", outcome)
    }

    #[tool(
        description = "Execute a PromQL range query with start time, end time, and step interval"
    )]
    pub async fn execute_range_query(
        &self,
        Parameters(params): Parameters<ExecuteRangeQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .client
            .execute_range_query(&params.query, &params.start, &params.end, &params.step)
            .await;
        respond("execute_range_query", outcome)
    }

    #[tool(description = "List all available metrics in Prometheus")]
    pub async fn list_metrics(&self) -> Result<CallToolResult, McpError> {
        respond("list_metrics", self.client.list_metrics().await)
    }

    #[tool(description = "Get metadata for a specific metric")]
    pub async fn get_metric_metadata(
        &self,
        Parameters(params): Parameters<MetricMetadataParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self.client.get_metric_metadata(&params.metric).await;
        respond("get_metric_metadata", outcome)
    }

    #[tool(description = "Get information about all scrape targets")]
    pub async fn get_targets(&self) -> Result<CallToolResult, McpError> {
        respond("get_targets", self.client.get_targets().await)
    }
}

impl PrometheusServer {
    /// Tool definitions as advertised by `tools/list`.
    pub fn tools(&self) -> Vec<rmcp::model::Tool> {
        self.tool_router.list_all()
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for PrometheusServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Successful results are returned as JSON text; failures as an error result
/// carrying the failure kind.
fn respond<T: Serialize>(
    tool: &str,
    outcome: Result<T, PrometheusError>,
) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(result) => {
            debug!("Tool {tool} succeeded");
            Ok(CallToolResult::success(vec![Content::json(result)?]))
        }
        Err(e) => {
            warn!("Tool {tool} failed: {e}");
            Ok(CallToolResult::error(vec![Content::text(format!(
                "{}: {}",
                e.kind(),
                e.message()
            ))]))
        }
    }
}

/// Run one MCP session over a reader/writer pair until the client disconnects.
///
/// # Errors
///
/// Returns [`McpServerError::Session`] if the initialize handshake fails or
/// the session task dies.
pub async fn run<R, W>(server: PrometheusServer, reader: R, writer: W) -> Result<(), McpServerError>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    let service = server
        .serve((reader, writer))
        .await
        .map_err(|e| McpServerError::Session {
            message: format!("MCP initialization failed: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!("MCP session initialized");

    let reason = service.waiting().await.map_err(|e| McpServerError::Session {
        message: format!("MCP session task failed: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    info!("MCP session ended: {reason:?}");
    Ok(())
}
