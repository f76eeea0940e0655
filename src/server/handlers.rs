//! Proxy Handlers
//!
//! Each handler forwards one browser request to the analysis backend and
//! maps upstream failures to `{"error": ...}` bodies.

use std::convert::Infallible;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use super::ProxyState;
use crate::constants::proxy;
use crate::constants::stream::{CONNECTION_FAILED, CONTENT_TYPE};
use crate::stream::{SseFrame, error_payload};
use crate::types::RepoWikiError;

const STREAM_CACHE_CONTROL: &str = "no-cache, no-store, max-age=0";

/// `POST /api/analyze` with `{"repoUrl": ...}` → `{"uuid": ...}`
pub async fn analyze(State(state): State<ProxyState>, body: Bytes) -> Response {
    let request: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            error!("Analyze request body is not JSON: {}", e);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, proxy::INTERNAL);
        }
    };

    let Some(repo_url) = request
        .get("repoUrl")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
    else {
        return json_error(StatusCode::BAD_REQUEST, proxy::REPO_URL_REQUIRED);
    };

    match state.backend.submit(repo_url).await {
        Ok(session_id) => {
            info!("Session {} started for {}", session_id, repo_url);
            Json(json!({ "uuid": session_id })).into_response()
        }
        Err(e) => upstream_error(e, proxy::ANALYZE_FAILED),
    }
}

/// `GET /api/analyze/:uuid` re-streams the backend's SSE body unchanged.
pub async fn stream(State(state): State<ProxyState>, Path(uuid): Path<String>) -> Response {
    let upstream = match state.backend.open_event_stream(&uuid).await {
        Ok(response) => {
            debug!("Relaying analysis stream for {}", uuid);
            Some(response.bytes_stream().boxed())
        }
        Err(e) => {
            warn!("Analysis stream for {} unavailable: {}", uuid, e);
            None
        }
    };

    (
        [
            (header::CONTENT_TYPE, CONTENT_TYPE),
            (header::CACHE_CONTROL, STREAM_CACHE_CONTROL),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Cache-Control"),
        ],
        Body::from_stream(relay(upstream)),
    )
        .into_response()
}

/// `POST /api/analyze/:uuid/ask` forwards `{"messages": [...]}` verbatim.
pub async fn ask(
    State(state): State<ProxyState>,
    Path(uuid): Path<String>,
    body: Bytes,
) -> Response {
    let request: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            error!("Ask request body is not JSON: {}", e);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, proxy::INTERNAL);
        }
    };

    if !request.get("messages").is_some_and(Value::is_array) {
        return json_error(StatusCode::BAD_REQUEST, proxy::MESSAGES_REQUIRED);
    }

    match state.backend.ask(&uuid, &request).await {
        Ok(answer) => Json(answer).into_response(),
        Err(e) => upstream_error(e, proxy::ASK_FAILED),
    }
}

pub async fn health() -> &'static str {
    "ok"
}

enum Relay {
    Upstream(BoxStream<'static, reqwest::Result<Bytes>>),
    Failed,
    Done,
}

/// Upstream bytes as-is. When the upstream cannot be opened or breaks, a
/// single application `error` frame is sent and the body ends.
fn relay(
    upstream: Option<BoxStream<'static, reqwest::Result<Bytes>>>,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    let initial = match upstream {
        Some(bytes) => Relay::Upstream(bytes),
        None => Relay::Failed,
    };

    stream::unfold(initial, |state| async move {
        match state {
            Relay::Upstream(mut bytes) => match bytes.next().await {
                Some(Ok(chunk)) => Some((Ok(chunk), Relay::Upstream(bytes))),
                Some(Err(e)) => {
                    warn!("Upstream analysis stream failed: {}", e);
                    Some((Ok(connection_failed_frame()), Relay::Done))
                }
                None => None,
            },
            Relay::Failed => Some((Ok(connection_failed_frame()), Relay::Done)),
            Relay::Done => None,
        }
    })
}

fn connection_failed_frame() -> Bytes {
    Bytes::from(SseFrame::message(error_payload(CONNECTION_FAILED)).encode())
}

fn upstream_error(err: RepoWikiError, fallback: &str) -> Response {
    match err {
        RepoWikiError::Backend { status, detail } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            json_error(status, detail.as_deref().unwrap_or(fallback))
        }
        other => {
            error!("Backend request failed: {}", other);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, proxy::INTERNAL)
        }
    }
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
