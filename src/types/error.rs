//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! Classifies failures so callers can decide between retrying and giving up.
//!
//! ## Error Categories
//!
//! - **Network**: Connectivity issues (retry with backoff)
//! - **RateLimit**: Upstream rate limiting (wait and retry)
//! - **Transient**: 5xx responses that may resolve (retry)
//! - **NotFound**: Missing file or session (fail fast)
//! - **BadRequest**: Invalid input (fix request)
//! - **Decode**: Payload did not match the expected shape

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories used for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connectivity issues - retry with backoff
    Network,
    /// Rate limited - wait then retry
    RateLimit,
    /// Temporary server issues - retry
    Transient,
    /// Resource does not exist - don't retry
    NotFound,
    /// Invalid request - don't retry, fix request
    BadRequest,
    /// Payload could not be decoded
    Decode,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "NETWORK"),
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Decode => write!(f, "DECODE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::RateLimit | Self::Transient)
    }

    /// Classify an HTTP status code
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimit,
            404 | 410 => Self::NotFound,
            400..=499 => Self::BadRequest,
            500..=599 => Self::Transient,
            _ => Self::Unknown,
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum RepoWikiError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// Request never produced a response (connect, DNS, body read)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Upstream answered with a non-success status
    #[error("Backend responded with status {status}{}", detail_suffix(.detail))]
    Backend { status: u16, detail: Option<String> },

    #[error("Stream error: {0}")]
    Stream(String),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    #[error("Failed to decode '{event_type}' payload: {reason}")]
    Decode { event_type: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl From<reqwest::Error> for RepoWikiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => RepoWikiError::Backend {
                status: status.as_u16(),
                detail: None,
            },
            None => RepoWikiError::Http(err.to_string()),
        }
    }
}

impl From<url::ParseError> for RepoWikiError {
    fn from(err: url::ParseError) -> Self {
        RepoWikiError::Config(format!("Invalid URL: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, RepoWikiError>;

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

// =============================================================================
// Helper Functions
// =============================================================================

impl RepoWikiError {
    /// Create a decode error for an event type
    pub fn decode(event_type: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            event_type: event_type.into(),
            reason: reason.to_string(),
        }
    }

    /// Category used for retry decisions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) | Self::Io(_) | Self::Stream(_) => ErrorCategory::Network,
            Self::Backend { status, .. } => ErrorCategory::from_status(*status),
            Self::Json(_) | Self::Decode { .. } => ErrorCategory::Decode,
            Self::InvalidRepoUrl(_) | Self::Config(_) => ErrorCategory::BadRequest,
            Self::Server(_) => ErrorCategory::Unknown,
        }
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Upstream status code, if the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(ErrorCategory::Decode.to_string(), "DECODE");
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(ErrorCategory::from_status(429), ErrorCategory::RateLimit);
        assert_eq!(ErrorCategory::from_status(404), ErrorCategory::NotFound);
        assert_eq!(ErrorCategory::from_status(422), ErrorCategory::BadRequest);
        assert_eq!(ErrorCategory::from_status(503), ErrorCategory::Transient);
        assert_eq!(ErrorCategory::from_status(302), ErrorCategory::Unknown);
    }

    #[test]
    fn test_recoverable() {
        assert!(RepoWikiError::Http("connection reset".into()).is_recoverable());
        assert!(
            RepoWikiError::Backend {
                status: 502,
                detail: None
            }
            .is_recoverable()
        );
        assert!(
            !RepoWikiError::Backend {
                status: 404,
                detail: None
            }
            .is_recoverable()
        );
        assert!(!RepoWikiError::decode("overview", "bad json").is_recoverable());
    }

    #[test]
    fn test_backend_error_display() {
        let with_detail = RepoWikiError::Backend {
            status: 422,
            detail: Some("Repository is private".into()),
        };
        assert_eq!(
            with_detail.to_string(),
            "Backend responded with status 422: Repository is private"
        );

        let bare = RepoWikiError::Backend {
            status: 500,
            detail: None,
        };
        assert_eq!(bare.to_string(), "Backend responded with status 500");
        assert_eq!(bare.status(), Some(500));
    }
}
