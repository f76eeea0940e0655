//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (user config dir) and project (./repowiki.toml) level configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::constants::{fetch, network};
use crate::types::{RepoWikiError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Analysis backend connection
    pub backend: BackendConfig,

    /// Browser-facing proxy
    pub server: ServerConfig,

    /// Raw file download retries
    pub fetch: FetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            backend: BackendConfig::default(),
            server: ServerConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `RepoWikiError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.backend.url).map_err(|e| {
            RepoWikiError::Config(format!("backend.url '{}' is invalid: {}", self.backend.url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RepoWikiError::Config(format!(
                "backend.url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.backend.request_timeout_secs == 0 {
            return Err(RepoWikiError::Config(
                "backend.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.backend.connect_timeout_secs == 0 {
            return Err(RepoWikiError::Config(
                "backend.connect_timeout_secs must be greater than 0".to_string(),
            ));
        }

        self.server.socket_addr()?;

        if self.fetch.min_delay_ms > self.fetch.max_delay_ms {
            return Err(RepoWikiError::Config(format!(
                "fetch.min_delay_ms ({}) must not exceed fetch.max_delay_ms ({})",
                self.fetch.min_delay_ms, self.fetch.max_delay_ms
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Backend Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the analysis service
    pub url: String,

    /// Timeout for submit and ask requests. The event stream has none.
    pub request_timeout_secs: u64,

    /// TCP connect timeout, applied to every request including the stream
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: network::DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: network::DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: network::CONNECTION_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address for `repowiki serve`
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: network::DEFAULT_BIND.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind.parse().map_err(|e| {
            RepoWikiError::Config(format!("server.bind '{}' is invalid: {}", self.bind, e))
        })
    }
}

// =============================================================================
// Fetch Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Retries after the first attempt
    pub max_retries: usize,

    /// First backoff delay (milliseconds)
    pub min_delay_ms: u64,

    /// Backoff ceiling (milliseconds)
    pub max_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: fetch::MAX_RETRIES,
            min_delay_ms: fetch::MIN_DELAY_MS,
            max_delay_ms: fetch::MAX_DELAY_MS,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
