//! Analyze Command
//!
//! Submit a repository for analysis and follow the session it starts.
//!
//! Usage:
//!   repowiki analyze <github-url> [view options]
//!   repowiki analyze <github-url> --detach

use tokio::runtime::Runtime;

use super::watch::{self, ViewOptions};
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::client::{RepoUrl, submit, validation_hint};
use crate::constants::messages;
use crate::types::Result;

pub fn run(ctx: &CommandContext, url: &str, detach: bool, options: &ViewOptions) -> Result<()> {
    let out = Output::new();

    let repo = match RepoUrl::parse(url) {
        Ok(repo) => repo,
        Err(e) => {
            out.error(validation_hint(url));
            return Err(e);
        }
    };

    let rt = Runtime::new()?;
    rt.block_on(async {
        let session_id = match submit(&ctx.backend, &repo).await {
            Ok(id) => id,
            Err(e) => {
                out.error(messages::SUBMISSION_FAILED);
                return Err(e);
            }
        };

        if detach || !options.is_json() {
            out.success(&format!(
                "Analysis started for {}/{}",
                repo.owner(),
                repo.name()
            ));
            out.info(&format!("Session: {}", session_id));
        }

        if detach {
            out.info(&format!("Follow with: repowiki watch {}", session_id));
            return Ok(());
        }

        watch::watch(ctx, &session_id, options).await
    })
}
