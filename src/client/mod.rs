//! Backend Collaborators
//!
//! HTTP clients for everything outside the stream reducer: session
//! submission, repository Q&A and raw file downloads.

mod backend;
mod chat;
mod files;
mod submission;

pub use backend::BackendClient;
pub use chat::{ChatMessage, ChatRole, ChatSession, QuestionAnswerer};
pub use files::FileFetcher;
pub use submission::{RepoUrl, submit, validation_hint};
