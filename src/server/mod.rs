//! Browser-Facing Proxy
//!
//! HTTP surface a browser frontend talks to. Every route forwards to the
//! analysis backend:
//!
//! | route                          | backend                    |
//! |--------------------------------|----------------------------|
//! | `POST /api/analyze`            | `POST /analyze`            |
//! | `GET  /api/analyze/:uuid`      | `GET  /analyze/:uuid` (SSE)|
//! | `POST /api/analyze/:uuid/ask`  | `POST /analyze/:uuid/ask`  |
//! | `GET  /health`                 | none                       |

mod handlers;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::client::BackendClient;
use crate::types::{RepoWikiError, Result};

/// Shared handler state
#[derive(Clone)]
pub struct ProxyState {
    pub backend: BackendClient,
}

impl ProxyState {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/analyze/:uuid", get(handlers::stream))
        .route("/api/analyze/:uuid/ask", post(handlers::ask))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: ProxyState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| RepoWikiError::Server(format!("Failed to bind {}: {}", addr, e)))?;
    let local_addr = listener.local_addr()?;

    info!(
        "Proxy listening on http://{} (backend {})",
        local_addr,
        state.backend.base_url()
    );

    axum::serve(listener, router(state))
        .await
        .map_err(|e| RepoWikiError::Server(e.to_string()))
}
