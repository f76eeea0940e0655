//! Raw File Fetcher
//!
//! Downloads README and source file content for display. Transient failures
//! (connect errors, 429, 5xx) are retried with exponential backoff; 404 and
//! other client errors fail immediately.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, warn};

use crate::config::{BackendConfig, FetchConfig};
use crate::types::{RepoWikiError, Result};
use crate::view::FileLink;

#[derive(Debug, Clone)]
pub struct FileFetcher {
    client: reqwest::Client,
    backoff: ExponentialBuilder,
}

impl FileFetcher {
    pub fn new(backend: &BackendConfig, fetch: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(backend.request_timeout())
            .connect_timeout(backend.connect_timeout())
            .build()
            .map_err(|e| RepoWikiError::Http(format!("Failed to create HTTP client: {}", e)))?;

        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(fetch.min_delay_ms))
            .with_max_delay(Duration::from_millis(fetch.max_delay_ms))
            .with_max_times(fetch.max_retries)
            .with_jitter();

        Ok(Self { client, backoff })
    }

    /// Content of the file behind `link`.
    pub async fn fetch(&self, link: &FileLink) -> Result<String> {
        self.fetch_url(&link.raw_url).await
    }

    pub async fn fetch_url(&self, url: &str) -> Result<String> {
        let content = (|| self.fetch_once(url))
            .retry(self.backoff)
            .sleep(tokio::time::sleep)
            .when(RepoWikiError::is_recoverable)
            .notify(|err: &RepoWikiError, delay: Duration| {
                warn!(
                    "Fetching {} failed ({}), retrying in {:?}: {}",
                    url,
                    err.category(),
                    delay,
                    err
                );
            })
            .await?;

        debug!("Fetched {} ({} bytes)", url, content.len());
        Ok(content)
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RepoWikiError::Backend {
                status: status.as_u16(),
                detail: None,
            });
        }
        Ok(response.text().await?)
    }
}
