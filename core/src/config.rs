//! Client configuration.
//!
//! The base URI and the request timeout are the only knobs. The timeout is
//! applied to the HTTP executor once, at construction; the transport layer
//! itself has no notion of time.

use std::env;
use std::time::Duration;

use crate::error::ApiError;

/// Default base URI, matching a locally running ledger API.
pub const DEFAULT_BASE_URI: &str = "http://localhost:8080";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Environment variable holding the base URI.
pub const BASE_URI_ENV: &str = "API_BASE_URI";

/// Environment variable holding the request timeout in whole seconds.
pub const TIMEOUT_ENV: &str = "API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URI of the API. Only its scheme and host are used.
    pub base_uri: String,

    /// Upper bound for a single request, connect to last body byte.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `API_BASE_URI` and `API_TIMEOUT_SECS`, defaulting whichever is unset.
    /// A timeout of zero seconds is rejected.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Some(base_uri) = lookup(BASE_URI_ENV) {
            config.base_uri = base_uri;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|e| {
                ApiError::InvalidConfiguration(format!("{e}; invalid {TIMEOUT_ENV} {raw:?}"))
            })?;
            if secs == 0 {
                return Err(ApiError::InvalidConfiguration(format!(
                    "timeout must be at least one second; invalid {TIMEOUT_ENV} {raw:?}"
                )));
            }
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
