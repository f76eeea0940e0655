//! Stream Consumer
//!
//! Owns the connection for one analysis session. A single tokio task reads
//! frames, folds them into [`SessionState`] and publishes each new snapshot on
//! a watch channel; readers never observe a half-applied event.
//!
//! Connection policy: at most one connection per session, no reconnect, no
//! timeout. A stalled backend leaves the session streaming indefinitely.
//!
//! The open frame stream lives in a slot shared by the task and the handle.
//! The task only borrows it for the duration of a single poll, so closing or
//! dropping the handle drops the connection before returning.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::Poll;

use futures::StreamExt;
use futures::future::poll_fn;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::event::StreamEvent;
use super::port::{FrameStream, StreamPort};
use super::reducer::{Flow, SessionState};
use super::sse::SseFrame;
use crate::constants::stream::CONNECTION_FAILED;
use crate::types::Result;

enum Connection {
    Opening,
    Open(FrameStream),
    Closed,
}

/// Connection shared between the consumer task and its handle.
#[derive(Clone)]
struct ConnectionSlot(Arc<Mutex<Connection>>);

impl ConnectionSlot {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Connection::Opening)))
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a freshly opened stream. Returns false when the session was
    /// closed while opening; the stream is dropped right away.
    fn install(&self, frames: FrameStream) -> bool {
        let mut conn = self.lock();
        if matches!(*conn, Connection::Closed) {
            return false;
        }
        *conn = Connection::Open(frames);
        true
    }

    /// Drop the stream (if any) now.
    fn release(&self) {
        let previous = std::mem::replace(&mut *self.lock(), Connection::Closed);
        drop(previous);
    }

    fn is_closed(&self) -> bool {
        matches!(*self.lock(), Connection::Closed)
    }

    /// Next frame; `None` once the stream ends or the slot is released.
    async fn next(&self) -> Option<Result<SseFrame>> {
        poll_fn(|cx| match &mut *self.lock() {
            Connection::Open(frames) => frames.poll_next_unpin(cx),
            Connection::Opening | Connection::Closed => Poll::Ready(None),
        })
        .await
    }
}

/// Spawns session consumers.
pub struct StreamConsumer;

impl StreamConsumer {
    /// Open the stream for `session_id` and start folding events.
    ///
    /// Must be called inside a tokio runtime.
    pub fn open(port: Arc<dyn StreamPort>, session_id: impl Into<String>) -> SessionHandle {
        let session_id = session_id.into();
        let (tx, rx) = watch::channel(SessionState::new());
        let connection = ConnectionSlot::new();
        let task = tokio::spawn(run_session(
            port,
            session_id.clone(),
            connection.clone(),
            tx,
        ));

        SessionHandle {
            session_id,
            state: rx,
            connection,
            task,
        }
    }
}

async fn run_session(
    port: Arc<dyn StreamPort>,
    session_id: String,
    connection: ConnectionSlot,
    tx: watch::Sender<SessionState>,
) {
    match port.open(&session_id).await {
        Ok(frames) => {
            if !connection.install(frames) {
                debug!("Session {} closed while opening", session_id);
                return;
            }
        }
        Err(e) => {
            warn!("Failed to open analysis stream for {}: {}", session_id, e);
            connection.release();
            tx.send_modify(|state| {
                state.apply(StreamEvent::Error(CONNECTION_FAILED.to_string()));
            });
            return;
        }
    }

    while let Some(item) = connection.next().await {
        match item {
            Ok(frame) if frame.is_message() => {
                debug!("Received SSE data: {}", frame.data);
                let event = StreamEvent::decode(&frame.data);
                let mut flow = Flow::Continue;
                tx.send_modify(|state| flow = state.apply(event));
                if flow == Flow::Close {
                    break;
                }
            }
            Ok(frame) => {
                debug!(
                    "Skipping named SSE event '{}'",
                    frame.event.as_deref().unwrap_or_default()
                );
            }
            Err(e) => {
                let reason = e.to_string();
                tx.send_modify(|state| state.record_transport_error(&reason));
            }
        }
    }

    connection.release();
    debug!("Analysis stream for {} released", session_id);
    tx.send_modify(SessionState::mark_closed);
}

/// Reader side of a running session. Dropping the handle closes the
/// connection.
pub struct SessionHandle {
    session_id: String,
    state: watch::Receiver<SessionState>,
    connection: ConnectionSlot,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Wait for the next snapshot. `None` once the consumer has finished and
    /// no further updates can arrive.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.state.changed().await.ok()?;
        Some(self.state.borrow_and_update().clone())
    }

    /// Wait until the session reaches a terminal status or the consumer stops.
    pub async fn wait_terminal(&mut self) -> SessionState {
        loop {
            {
                let state = self.state.borrow_and_update();
                if state.status.is_terminal() {
                    return state.clone();
                }
            }
            if self.state.changed().await.is_err() {
                return self.snapshot();
            }
        }
    }

    /// Wait until the consumer has released the connection.
    pub async fn wait_closed(&mut self) -> SessionState {
        while self.state.changed().await.is_ok() {}
        self.snapshot()
    }

    /// Close the connection now. The stream is dropped before this returns.
    pub fn close(&self) {
        self.connection.release();
        self.task.abort();
    }

    /// Whether the connection has been released.
    pub fn is_closed(&self) -> bool {
        self.connection.is_closed()
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.close();
    }
}
