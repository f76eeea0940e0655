//! Repository Q&A
//!
//! Chat history for one analysis session. Failures stay inside the chat: they
//! become a synthetic assistant message and never touch the analysis stream.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};
use uuid::Uuid;

use super::backend::BackendClient;
use crate::constants::messages;
use crate::types::{Result, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Answers questions about an analyzed repository.
#[async_trait]
pub trait QuestionAnswerer: Send + Sync {
    /// `body` is `{"messages": [{role, content}, ...]}`; the reply is the
    /// backend's JSON, normally `{"response": "..."}`.
    async fn answer(&self, session_id: &str, body: &Value) -> Result<Value>;
}

#[async_trait]
impl QuestionAnswerer for BackendClient {
    async fn answer(&self, session_id: &str, body: &Value) -> Result<Value> {
        self.ask(session_id, body).await
    }
}

pub struct ChatSession {
    session_id: SessionId,
    answerer: Arc<dyn QuestionAnswerer>,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(session_id: SessionId, answerer: Arc<dyn QuestionAnswerer>) -> Self {
        Self {
            session_id,
            answerer,
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Ask a question. Blank input is ignored and returns `None`; otherwise
    /// the assistant's reply (real or synthetic) is returned.
    pub async fn send(&mut self, question: &str) -> Option<&ChatMessage> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::new(ChatRole::User, question));
        let body = self.request_body();

        let reply = match self.answerer.answer(self.session_id.as_str(), &body).await {
            Ok(answer) => answer
                .get("response")
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    debug!("Answer had no response field: {}", answer);
                    messages::CHAT_NO_ANSWER.to_string()
                }),
            Err(e) => {
                warn!("Question for session {} failed: {}", self.session_id, e);
                messages::CHAT_FAILED.to_string()
            }
        };

        self.messages.push(ChatMessage::new(ChatRole::Assistant, reply));
        self.messages.last()
    }

    fn request_body(&self) -> Value {
        let history: Vec<Value> = self
            .messages
            .iter()
            .map(|m| json!({ "role": m.role, "content": m.content }))
            .collect();
        json!({ "messages": history })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RepoWikiError;
    use std::sync::Mutex;

    struct MockAnswerer {
        replies: Mutex<Vec<Result<Value>>>,
        seen: Mutex<Vec<Value>>,
    }

    impl MockAnswerer {
        fn new(replies: Vec<Result<Value>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl QuestionAnswerer for MockAnswerer {
        async fn answer(&self, session_id: &str, body: &Value) -> Result<Value> {
            assert_eq!(session_id, "s1");
            self.seen.lock().unwrap().push(body.clone());
            self.replies.lock().unwrap().remove(0)
        }
    }

    #[tokio::test]
    async fn test_send_posts_full_history() {
        let mock = MockAnswerer::new(vec![
            Ok(json!({ "response": "It parses widgets." })),
            Ok(json!({ "response": "In src/lib.rs." })),
        ]);
        let mut chat = ChatSession::new(SessionId::new("s1"), mock.clone());

        let reply = chat.send("What does it do?").await.unwrap();
        assert_eq!(reply.role, ChatRole::Assistant);
        assert_eq!(reply.content, "It parses widgets.");

        chat.send("Where?").await.unwrap();
        let seen = mock.seen.lock().unwrap();
        let history = seen[1]["messages"].as_array().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0]["role"], "user");
        assert_eq!(history[1]["role"], "assistant");
        assert_eq!(history[2]["content"], "Where?");
        assert_eq!(chat.messages().len(), 4);
    }

    #[tokio::test]
    async fn test_blank_question_is_ignored() {
        let mock = MockAnswerer::new(Vec::new());
        let mut chat = ChatSession::new(SessionId::new("s1"), mock.clone());

        assert!(chat.send("   ").await.is_none());
        assert!(chat.messages().is_empty());
        assert!(mock.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_response_field() {
        let mock = MockAnswerer::new(vec![Ok(json!({ "answer": "wrong key" }))]);
        let mut chat = ChatSession::new(SessionId::new("s1"), mock);

        let reply = chat.send("hello").await.unwrap();
        assert_eq!(reply.content, messages::CHAT_NO_ANSWER);
    }

    #[tokio::test]
    async fn test_empty_response_counts_as_missing() {
        let mock = MockAnswerer::new(vec![Ok(json!({ "response": "" }))]);
        let mut chat = ChatSession::new(SessionId::new("s1"), mock);

        let reply = chat.send("hello").await.unwrap();
        assert_eq!(reply.role, ChatRole::Assistant);
        assert_eq!(reply.content, messages::CHAT_NO_ANSWER);
    }

    #[tokio::test]
    async fn test_failure_becomes_assistant_message() {
        let mock = MockAnswerer::new(vec![Err(RepoWikiError::Backend {
            status: 500,
            detail: None,
        })]);
        let mut chat = ChatSession::new(SessionId::new("s1"), mock);

        let reply = chat.send("hello").await.unwrap();
        assert_eq!(reply.role, ChatRole::Assistant);
        assert_eq!(reply.content, messages::CHAT_FAILED);
        assert_eq!(chat.messages().len(), 2);

        chat.clear();
        assert!(chat.messages().is_empty());
    }
}
