//! Repository URL submission.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::backend::BackendClient;
use crate::constants::messages;
use crate::types::{RepoWikiError, Result, SessionId};

// owner and repository name captured as groups 2 and 3
static GITHUB_REPO: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?github\.com/([\w\-.]+)/([\w\-.]+)/?$").ok()
});

/// A validated public GitHub repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrl {
    url: String,
    owner: String,
    name: String,
}

impl RepoUrl {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let captures = GITHUB_REPO
            .as_ref()
            .and_then(|re| re.captures(trimmed))
            .ok_or_else(|| RepoWikiError::InvalidRepoUrl(validation_hint(trimmed).to_string()))?;

        Ok(Self {
            url: trimmed.to_string(),
            owner: captures[2].to_string(),
            name: captures[3].to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Inline hint for input that is not a repository URL.
pub fn validation_hint(input: &str) -> &'static str {
    let input = input.trim();
    if !input.starts_with("http://") && !input.starts_with("https://") {
        messages::URL_NOT_HTTP
    } else if !input.contains("github.com") {
        messages::URL_NOT_GITHUB
    } else {
        messages::URL_BAD_FORMAT
    }
}

/// Submit a validated URL. Backend failures are logged with their detail;
/// callers show [`messages::SUBMISSION_FAILED`].
pub async fn submit(client: &BackendClient, repo: &RepoUrl) -> Result<SessionId> {
    client.submit(repo.as_str()).await.inspect_err(|e| {
        warn!("Submission of {} failed: {}", repo, e);
    })
}
