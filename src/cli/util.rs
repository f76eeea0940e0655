//! CLI Common Utilities
//!
//! Shared initialization and context management for CLI commands.

use std::sync::Arc;

use crate::client::{BackendClient, FileFetcher};
use crate::config::{Config, ConfigLoader};
use crate::stream::{HttpStreamPort, StreamPort};
use crate::types::Result;

/// Command execution context
///
/// Resolved configuration plus the clients built from it.
#[derive(Clone)]
pub struct CommandContext {
    /// Loaded configuration (CLI overrides applied)
    pub config: Config,
    /// Analysis backend client
    pub backend: BackendClient,
}

impl CommandContext {
    /// Load configuration and apply a `--backend` override.
    pub fn load(backend_override: Option<&str>) -> Result<Self> {
        let config = ConfigLoader::load()?;
        Self::from_config(config, backend_override)
    }

    pub fn from_config(mut config: Config, backend_override: Option<&str>) -> Result<Self> {
        if let Some(url) = backend_override {
            config.backend.url = url.to_string();
            config.validate()?;
        }
        let backend = BackendClient::new(&config.backend)?;
        Ok(Self { config, backend })
    }

    /// Stream port over the configured backend
    pub fn stream_port(&self) -> Arc<dyn StreamPort> {
        Arc::new(HttpStreamPort::new(self.backend.clone()))
    }

    /// File fetcher with the configured retry policy
    pub fn file_fetcher(&self) -> Result<FileFetcher> {
        FileFetcher::new(&self.config.backend, &self.config.fetch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_override_applies() {
        let ctx =
            CommandContext::from_config(Config::default(), Some("https://wiki.example.com/api"))
                .unwrap();
        assert_eq!(ctx.config.backend.url, "https://wiki.example.com/api");
        assert_eq!(ctx.backend.base_url().host_str(), Some("wiki.example.com"));
    }

    #[test]
    fn test_backend_override_is_validated() {
        assert!(CommandContext::from_config(Config::default(), Some("nope")).is_err());
    }
}
