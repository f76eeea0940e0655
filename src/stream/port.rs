//! Stream Port
//!
//! Transport seam for the analysis stream. The consumer only sees a stream of
//! SSE frames; dropping that stream closes the underlying connection.

use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use tracing::debug;

use super::sse::{SseDecoder, SseFrame};
use crate::client::BackendClient;
use crate::types::{RepoWikiError, Result};

/// Frames of one open session stream.
pub type FrameStream = BoxStream<'static, Result<SseFrame>>;

/// Opens analysis streams by session id.
#[async_trait]
pub trait StreamPort: Send + Sync {
    async fn open(&self, session_id: &str) -> Result<FrameStream>;
}

/// SSE over HTTP against the analysis backend.
#[derive(Clone)]
pub struct HttpStreamPort {
    client: BackendClient,
}

impl HttpStreamPort {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StreamPort for HttpStreamPort {
    async fn open(&self, session_id: &str) -> Result<FrameStream> {
        let response = self.client.open_event_stream(session_id).await?;
        debug!("Analysis stream opened for session {}", session_id);
        Ok(sse_frames(response.bytes_stream()))
    }
}

struct FrameState<E> {
    bytes: BoxStream<'static, std::result::Result<Bytes, E>>,
    decoder: SseDecoder,
    ready: VecDeque<SseFrame>,
    exhausted: bool,
}

/// Decode a byte stream into SSE frames. Byte-level errors are passed
/// through as [`RepoWikiError::Stream`] items.
pub fn sse_frames<S, E>(bytes: S) -> FrameStream
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = FrameState {
        bytes: bytes.boxed(),
        decoder: SseDecoder::new(),
        ready: VecDeque::new(),
        exhausted: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(frame) = state.ready.pop_front() {
                return Some((Ok(frame), state));
            }
            if state.exhausted {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => state.ready.extend(state.decoder.feed(&chunk)),
                Some(Err(e)) => {
                    return Some((Err(RepoWikiError::Stream(e.to_string())), state));
                }
                None => {
                    state.exhausted = true;
                    state.ready.extend(state.decoder.finish());
                }
            }
        }
    })
    .boxed()
}
