//! Global Constants
//!
//! Centralized constants for configuration and user-facing copy.
//! All magic numbers and fixed strings should be defined here.

/// HTTP/Network constants
pub mod network {
    /// Default analysis backend
    pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

    /// Default timeout for submit/ask requests (seconds).
    /// The analysis stream itself has no timeout.
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;

    /// Default proxy bind address
    pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
}

/// Raw file fetch retry constants
pub mod fetch {
    /// Maximum retries for a raw file download
    pub const MAX_RETRIES: usize = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const MIN_DELAY_MS: u64 = 500;

    /// Maximum delay between retries (milliseconds)
    pub const MAX_DELAY_MS: u64 = 5_000;
}

/// Event stream wire constants
pub mod stream {
    pub const EVENT_START: &str = "start";
    pub const EVENT_OVERVIEW: &str = "overview";
    pub const EVENT_README: &str = "readme";
    pub const EVENT_AUTH_ANALYSIS: &str = "auth_analysis";
    pub const EVENT_DATA_MODEL_ANALYSIS: &str = "data_model_analysis";
    pub const EVENT_ENTRY_POINTS: &str = "entry_points";
    pub const EVENT_COMPLETED: &str = "completed";
    pub const EVENT_ERROR: &str = "error";

    /// Application error used when the upstream stream cannot be reached
    pub const CONNECTION_FAILED: &str = "Connection to analysis service failed";

    /// SSE content type
    pub const CONTENT_TYPE: &str = "text/event-stream";
}

/// User-facing copy
pub mod messages {
    pub const README_MISSING: &str =
        "This repo doesn't have a readme file.\nPlease finish for AI wiki to generate a summary.";

    pub const ANALYSIS_FAILED: &str = "Analysis Failed";

    pub const BACK_TO_HOME: &str = "Back to Home";

    pub const SUBMISSION_FAILED: &str = "Can't access the repository. Please check if it's public.";

    pub const URL_NOT_HTTP: &str = "Please enter a valid URL starting with http:// or https://";

    pub const URL_NOT_GITHUB: &str = "Please enter a valid GitHub repository URL";

    pub const URL_BAD_FORMAT: &str = "Please enter a valid GitHub repository URL format";

    pub const CHAT_NO_ANSWER: &str = "Sorry, I couldn't process your question.";

    pub const CHAT_FAILED: &str =
        "Sorry, there was an error processing your question. Please try again.";
}

/// Proxy error bodies
pub mod proxy {
    pub const REPO_URL_REQUIRED: &str = "Repository URL is required";
    pub const ANALYZE_FAILED: &str = "Failed to analyze repository";
    pub const MESSAGES_REQUIRED: &str = "Messages array is required";
    pub const ASK_FAILED: &str = "Failed to process question";
    pub const INTERNAL: &str = "Internal server error";
}
