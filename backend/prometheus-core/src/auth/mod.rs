//! Picks the single authentication mechanism a request uses.
//!
//! # Precedence
//!
//! 1. A non-empty bearer token wins, whatever else is configured.
//! 2. Otherwise, a non-empty username AND a non-empty password give basic auth.
//! 3. Otherwise the request is unauthenticated.
//!
//! Partial credentials (only a username, only a password) are not an error
//! here. They fall through to [`AuthMechanism::None`] and show up later as an
//! upstream 401/403.

use crate::config::PrometheusConfig;

use common::RedactedSecret;

/// At most one of these is active per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMechanism<'a> {
    None,
    Basic {
        username: &'a str,
        password: &'a RedactedSecret,
    },
    Bearer {
        token: &'a RedactedSecret,
    },
}

impl AuthMechanism<'_> {
    pub fn describe(&self) -> &'static str {
        match self {
            AuthMechanism::None => "none",
            AuthMechanism::Basic { .. } => "basic auth",
            AuthMechanism::Bearer { .. } => "bearer token",
        }
    }
}

/// Pure function of the bundle; called once per request.
pub fn resolve(config: &PrometheusConfig) -> AuthMechanism<'_> {
    if !config.token().is_empty() {
        return AuthMechanism::Bearer {
            token: config.token(),
        };
    }

    if !config.username().is_empty() && !config.password().is_empty() {
        return AuthMechanism::Basic {
            username: config.username(),
            password: config.password(),
        };
    }

    AuthMechanism::None
}
