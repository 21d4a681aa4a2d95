use prometheus_mcp::error::McpServerError;
use prometheus_mcp::logger::initialize as LoggerInitialize;
use prometheus_mcp::server::{PrometheusServer, run as ServerRun};
use prometheus_mcp::startup::{ensure_log_dir, log_dir, setup_environment};

use prometheus_core::PrometheusClient;

use std::process::ExitCode;

use log::{error, info};
use rmcp::transport::stdio;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Prometheus MCP server stopped: {e}");
            // Logger may not be up yet
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), McpServerError> {
    let log_dir = log_dir();
    ensure_log_dir(&log_dir)?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir)?;

    info!("Starting Prometheus MCP Server...");
    info!("Log directory: {}", log_dir.display());

    let config = setup_environment()?;
    let client = PrometheusClient::new(config)?;

    let server = PrometheusServer::new(client);

    info!("Running server in stdio mode");
    let (input, output) = stdio();
    ServerRun(server, input, output).await?;

    info!("Prometheus MCP server shut down");
    Ok(())
}
