//! Ask Command
//!
//! Ask questions about an analyzed repository.
//!
//! Usage:
//!   repowiki ask <session-id> "Where is the HTTP server started?"
//!   repowiki ask <session-id>            # interactive, /clear and /exit

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Runtime;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::client::ChatSession;
use crate::types::{Result, SessionId};

/// Line typed at the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput<'a> {
    Question(&'a str),
    Clear,
    Exit,
    Blank,
}

impl<'a> ChatInput<'a> {
    pub fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => ChatInput::Blank,
            "/clear" => ChatInput::Clear,
            "/exit" | "/quit" => ChatInput::Exit,
            question => ChatInput::Question(question),
        }
    }
}

pub fn run(ctx: &CommandContext, session_id: &str, question: Option<&str>) -> Result<()> {
    let mut chat = ChatSession::new(
        SessionId::new(session_id),
        Arc::new(ctx.backend.clone()),
    );
    let out = Output::new();

    let rt = Runtime::new()?;
    rt.block_on(async {
        if let Some(question) = question {
            if let Some(reply) = chat.send(question).await {
                out.text(&reply.content);
            }
            return Ok(());
        }

        out.info("Ask about the repository. /clear resets the conversation, /exit quits.");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            match ChatInput::parse(&line) {
                ChatInput::Blank => continue,
                ChatInput::Exit => break,
                ChatInput::Clear => {
                    chat.clear();
                    out.success("Conversation cleared");
                }
                ChatInput::Question(question) => {
                    if let Some(reply) = chat.send(question).await {
                        out.chat("assistant", &reply.content);
                    }
                }
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_input_parse() {
        assert_eq!(ChatInput::parse("  "), ChatInput::Blank);
        assert_eq!(ChatInput::parse("/clear"), ChatInput::Clear);
        assert_eq!(ChatInput::parse(" /exit "), ChatInput::Exit);
        assert_eq!(
            ChatInput::parse("where is main? "),
            ChatInput::Question("where is main?")
        );
    }
}
