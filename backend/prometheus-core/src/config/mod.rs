//! The credential bundle: where Prometheus lives and how to authenticate.
//!
//! A [`PrometheusConfig`] is built once at startup, either with the builder
//! methods or from the process environment, and is never mutated afterwards.
//! [`crate::PrometheusClient`] holds it behind an `Arc` so concurrent
//! operations all see the same snapshot.

pub mod dotenv;

pub use dotenv::load_dotenv;

use crate::auth;
use crate::error::ConfigError;

use common::RedactedSecret;

use std::env::{self, VarError};
use std::time::Duration;

use log::warn;
use url::Url;

pub const URL_ENV: &str = "PROMETHEUS_URL";
pub const USERNAME_ENV: &str = "PROMETHEUS_USERNAME";
pub const PASSWORD_ENV: &str = "PROMETHEUS_PASSWORD";
pub const TOKEN_ENV: &str = "PROMETHEUS_TOKEN";
pub const ORG_ID_ENV: &str = "ORG_ID";
pub const TIMEOUT_SECS_ENV: &str = "PROMETHEUS_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrometheusConfig {
    url: String,
    username: String,
    password: RedactedSecret,
    token: RedactedSecret,
    org_id: String,
    timeout: Duration,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: RedactedSecret::default(),
            token: RedactedSecret::default(),
            org_id: String::new(),
            timeout: DEFAULT_TIMEOUT_DURATION,
        }
    }
}

impl PrometheusConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<RedactedSecret>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<RedactedSecret>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = org_id.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the bundle from the process environment.
    ///
    /// Unset variables read as empty. Call [`load_dotenv`] first if a `.env`
    /// file should be honoured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvVar`] if a variable holds non-unicode data.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name))
    }

    /// Read the bundle through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let read = |name: &str| -> Result<String, ConfigError> {
            match lookup(name) {
                Ok(value) => Ok(value),
                Err(VarError::NotPresent) => Ok(String::new()),
                Err(VarError::NotUnicode(_)) => {
                    Err(ConfigError::env_var(name, "contains invalid unicode"))
                }
            }
        };

        let timeout = match read(TIMEOUT_SECS_ENV)?.trim() {
            "" => DEFAULT_TIMEOUT_DURATION,
            raw => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(
                        "Ignoring {TIMEOUT_SECS_ENV}='{raw}', using default of {}s",
                        DEFAULT_TIMEOUT_DURATION.as_secs()
                    );
                    DEFAULT_TIMEOUT_DURATION
                }
            },
        };

        Ok(Self {
            url: read(URL_ENV)?,
            username: read(USERNAME_ENV)?,
            password: RedactedSecret::new(read(PASSWORD_ENV)?),
            token: RedactedSecret::new(read(TOKEN_ENV)?),
            org_id: read(ORG_ID_ENV)?,
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &RedactedSecret {
        &self.password
    }

    pub fn token(&self) -> &RedactedSecret {
        &self.token
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Which auth mechanism requests will use. Safe to log.
    pub fn auth_summary(&self) -> &'static str {
        auth::resolve(self).describe()
    }

    /// Startup check on the base URL.
    ///
    /// The request executor does not call this: it only refuses an empty URL,
    /// so a running server keeps reporting per-operation configuration errors.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingUrl`] if the URL is empty
    /// - [`ConfigError::Validation`] if it is not an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ConfigError::missing_url(URL_ENV));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::validation(format!(
                "Invalid URL format: {url} (expected http:// or https://)"
            )));
        }

        Url::parse(url)
            .map_err(|e| ConfigError::validation(format!("Invalid URL {url}: {e}")))?;

        Ok(())
    }
}
