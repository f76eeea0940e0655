//! RepoWiki - Terminal Client for AI-Generated Repository Wikis
//!
//! Submits a GitHub repository to an analysis backend, follows the
//! server-sent event stream that delivers the analysis piece by piece, and
//! renders it as a navigable wiki.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use repowiki::{BackendClient, Config, HttpStreamPort, StreamConsumer};
//!
//! let config = Config::default();
//! let backend = BackendClient::new(&config.backend)?;
//! let session = backend.submit("https://github.com/owner/name").await?;
//! let mut handle = StreamConsumer::open(Arc::new(HttpStreamPort::new(backend)), session);
//! let state = handle.wait_terminal().await;
//! ```
//!
//! ## Modules
//!
//! - [`stream`]: SSE decoding, event payloads, session state reduction
//! - [`view`]: Section selection and render derivation
//! - [`client`]: Backend submission, chat, raw file downloads
//! - [`server`]: Browser-facing proxy
//! - [`config`]: Layered configuration

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod server;
pub mod stream;
pub mod types;
pub mod view;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{ErrorCategory, RepoWikiError, Result};

// Data Model
pub use types::{AnalysisRecord, SessionId};

// =============================================================================
// Session Re-exports
// =============================================================================

pub use client::{BackendClient, ChatSession, FileFetcher, RepoUrl};
pub use stream::{
    HttpStreamPort, SessionHandle, SessionState, SessionStatus, StreamConsumer, StreamEvent,
    StreamPort,
};
pub use view::{RenderInstruction, Section, SelectionAction, SelectionState, derive};
