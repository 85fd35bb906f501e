//! Server configuration.
//!
//! Loaded from environment variables with sensible defaults.

use crate::pipeline::DEFAULT_BODY_LIMIT;
use serde::{Deserialize, Serialize};
use std::env;

/// Settings for serving a [`crate::RestService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log filter directive (e.g. `info`, `composable_restful_web=debug`)
    pub log_filter: String,
    /// Maximum buffered request body, in bytes
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_filter: "info".to_string(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `RESTFUL_HOST` | `0.0.0.0` |
    /// | `RESTFUL_PORT` | `8080` |
    /// | `RESTFUL_LOG` | `info` |
    /// | `RESTFUL_BODY_LIMIT` | `2097152` |
    ///
    /// Values that fail to parse fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("RESTFUL_HOST").unwrap_or(defaults.host),
            port: lookup("RESTFUL_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            log_filter: lookup("RESTFUL_LOG").unwrap_or(defaults.log_filter),
            body_limit: lookup("RESTFUL_BODY_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.body_limit),
        }
    }

    /// `host:port` as passed to the listener.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
