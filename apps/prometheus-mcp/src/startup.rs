//! Builds the credential bundle before the server accepts any call.

use crate::error::McpServerError;

use common::ErrorLocation;

use prometheus_core::PrometheusConfig;
use prometheus_core::config::load_dotenv;

use std::panic::Location;
use std::path::PathBuf;

use log::{error, info};

/// Where the log file goes; defaults to the system temp dir.
pub const LOG_DIR_ENV: &str = "PROMETHEUS_MCP_LOG_DIR";

pub fn log_dir() -> PathBuf {
    std::env::var_os(LOG_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

pub fn ensure_log_dir(log_dir: &std::path::Path) -> Result<(), McpServerError> {
    std::fs::create_dir_all(log_dir).map_err(|e| McpServerError::Startup {
        message: format!("Failed to create log directory {}: {e}", log_dir.display()),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Load `.env`, read the environment and refuse to start without a usable URL.
///
/// # Errors
///
/// Returns [`McpServerError::Config`] if a variable is unreadable or the URL
/// is missing or malformed.
pub fn setup_environment() -> Result<PrometheusConfig, McpServerError> {
    match load_dotenv() {
        Some(path) => info!("Environment file: {}", path.display()),
        None => info!("No .env file found or could not load it - using environment variables"),
    }

    let config = PrometheusConfig::from_env()?;
    check_config(&config)?;
    Ok(config)
}

/// Validate the bundle and log a secret-free summary of it.
pub fn check_config(config: &PrometheusConfig) -> Result<(), McpServerError> {
    if let Err(e) = config.validate() {
        error!("{e}");
        error!("Set PROMETHEUS_URL to your Prometheus server URL, e.g. http://your-prometheus-server:9090");
        return Err(e.into());
    }

    info!("Prometheus configuration:");
    info!("  Server URL: {}", config.url());
    info!("  Authentication: {}", config.auth_summary());
    if !config.org_id().is_empty() {
        info!("  Tenant (X-Scope-OrgID): {}", config.org_id());
    }
    info!("  Request timeout: {}s", config.timeout().as_secs());

    Ok(())
}
