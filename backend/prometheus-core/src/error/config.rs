use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

/// Startup-time configuration failures.
///
/// These are raised while loading or validating the credential bundle, never
/// by a running operation (operations report [`super::PrometheusError`]).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Missing URL Error: {variable} is not set {location}")]
    MissingUrl {
        variable: &'static str,
        location: ErrorLocation,
    },

    #[error("Config Environment Error: {variable}: {reason} {location}")]
    EnvVar {
        variable: String,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Config Validation Error: {reason} {location}")]
    Validation {
        reason: String,
        location: ErrorLocation,
    },
}

impl ConfigError {
    #[track_caller]
    pub fn missing_url(variable: &'static str) -> Self {
        ConfigError::MissingUrl {
            variable,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn env_var(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::EnvVar {
            variable: variable.into(),
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation(reason: impl Into<String>) -> Self {
        ConfigError::Validation {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
