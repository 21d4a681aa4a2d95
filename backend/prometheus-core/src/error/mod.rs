pub mod config;
pub mod prometheus;

pub use config::ConfigError;
pub use prometheus::PrometheusError;
