//! Analysis Backend Client
//!
//! Thin HTTP client for the analysis service:
//! - `POST /analyze` starts a session
//! - `GET /analyze/{id}` is the session's event stream
//! - `POST /analyze/{id}/ask` answers a question about the repository

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};
use url::Url;

use crate::config::BackendConfig;
use crate::constants::stream::CONTENT_TYPE;
use crate::types::{RepoWikiError, Result, SessionId};

const ANALYZE_PATH: &str = "analyze";
const ASK_PATH: &str = "ask";

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    repo_id: Option<String>,
}

/// HTTP client for the analysis backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    base: Url,
    /// Request/response calls, bounded by the request timeout
    client: reqwest::Client,
    /// Event streams: connect timeout only, a session may stream for minutes
    stream_client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base = Url::parse(&config.url)?;
        if base.cannot_be_a_base() {
            return Err(RepoWikiError::Config(format!(
                "Backend URL cannot be used as a base: {}",
                config.url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| RepoWikiError::Http(format!("Failed to create HTTP client: {}", e)))?;

        let stream_client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| RepoWikiError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base,
            client,
            stream_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Start an analysis session for a repository URL.
    pub async fn submit(&self, repo_url: &str) -> Result<SessionId> {
        let url = self.endpoint(&[ANALYZE_PATH])?;
        info!("Submitting {} for analysis", repo_url);

        let response = self
            .client
            .post(url)
            .json(&json!({ "url": repo_url }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: AnalyzeResponse = response.json().await?;
        let id = body
            .repo_id
            .ok_or_else(|| RepoWikiError::decode(ANALYZE_PATH, "no repo_id in backend response"))?;
        debug!("Backend assigned session {}", id);
        Ok(SessionId::new(id))
    }

    /// Open the session's event stream. The response body is the stream.
    pub async fn open_event_stream(&self, session_id: &str) -> Result<reqwest::Response> {
        let url = self.endpoint(&[ANALYZE_PATH, session_id])?;
        debug!("Opening event stream: {}", url);

        let response = self
            .stream_client
            .get(url)
            .header(reqwest::header::ACCEPT, CONTENT_TYPE)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response)
    }

    /// Forward a question body (`{"messages": [...]}`) and return the
    /// backend's JSON answer unchanged.
    pub async fn ask(&self, session_id: &str, body: &Value) -> Result<Value> {
        let url = self.endpoint(&[ANALYZE_PATH, session_id, ASK_PATH])?;
        debug!("Asking backend about session {}", session_id);

        let response = self.client.post(url).json(body).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json().await?)
    }

    /// Base URL plus percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RepoWikiError::Config(format!("Invalid backend URL: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Non-success response to `Backend { status, detail }`, where `detail` is
/// the upstream JSON `detail` field when present.
async fn error_from_response(response: reqwest::Response) -> RepoWikiError {
    let status = response.status().as_u16();
    let detail = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("detail").cloned())
        .and_then(|detail| match detail {
            Value::Null => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        });

    debug!(
        "Backend returned {} ({})",
        status,
        detail.as_deref().unwrap_or("no detail")
    );
    RepoWikiError::Backend { status, detail }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(url: &str) -> BackendClient {
        BackendClient::new(&BackendConfig {
            url: url.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_encodes_session_segment() {
        let client = client("http://localhost:8000/api/");
        let url = client.endpoint(&["analyze", "a b/../c", "ask"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/analyze/a%20b%2F..%2Fc/ask"
        );
    }

    #[tokio::test]
    async fn test_submit_returns_session_id() {
        let app = Router::new().route(
            "/analyze",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["url"], "https://github.com/acme/widgets");
                Json(json!({ "repo_id": "abc-123" }))
            }),
        );
        let base = spawn(app).await;

        let id = client(&base)
            .submit("https://github.com/acme/widgets")
            .await
            .unwrap();
        assert_eq!(id.as_str(), "abc-123");
    }

    #[tokio::test]
    async fn test_submit_surfaces_detail() {
        let app = Router::new().route(
            "/analyze",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "detail": "Repository is private" })),
                )
            }),
        );
        let base = spawn(app).await;

        let err = client(&base).submit("https://github.com/acme/x").await.unwrap_err();
        match err {
            RepoWikiError::Backend { status, detail } => {
                assert_eq!(status, 422);
                assert_eq!(detail.as_deref(), Some("Repository is private"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ask_passes_json_through() {
        let app = Router::new().route(
            "/analyze/:id/ask",
            post(
                |axum::extract::Path(id): axum::extract::Path<String>,
                 Json(body): Json<Value>| async move {
                    let count = body["messages"].as_array().map(Vec::len).unwrap_or(0);
                    Json(json!({ "response": format!("{id}:{count}"), "extra": true }))
                },
            ),
        );
        let base = spawn(app).await;

        let answer = client(&base)
            .ask("s1", &json!({ "messages": [{"role": "user", "content": "hi"}] }))
            .await
            .unwrap();
        assert_eq!(answer["response"], "s1:1");
        assert_eq!(answer["extra"], true);
    }

    #[tokio::test]
    async fn test_open_event_stream_rejects_missing_session() {
        let app = Router::new().route(
            "/analyze/:id",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "detail": "Unknown session" }))) }),
        );
        let base = spawn(app).await;

        let err = client(&base).open_event_stream("nope").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
