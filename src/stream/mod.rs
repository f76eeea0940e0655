//! Analysis Stream
//!
//! Consumes the backend's per-session event stream and assembles a partial,
//! progressively completed [`AnalysisRecord`](crate::types::AnalysisRecord).
//!
//! ## Modules
//!
//! - `sse`: incremental text/event-stream decoder
//! - `event`: tagged union of decoded stream events
//! - `reducer`: pure fold of events into session state
//! - `port`: transport seam (HTTP implementation included)
//! - `consumer`: task that owns the connection and publishes snapshots

mod consumer;
mod event;
mod port;
mod reducer;
mod sse;

pub use consumer::{SessionHandle, StreamConsumer};
pub use event::{StreamEvent, error_payload};
pub use port::{FrameStream, HttpStreamPort, StreamPort, sse_frames};
pub use reducer::{DecodeFailure, Flow, SessionState, SessionStatus, fold};
pub use sse::{SseDecoder, SseFrame};
