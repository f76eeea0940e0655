//! Serve Command
//!
//! Run the browser-facing proxy in front of the analysis backend.
//!
//! Usage:
//!   repowiki serve [--bind 127.0.0.1:3000]

use tokio::runtime::Runtime;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::server::{self, ProxyState};
use crate::types::Result;

pub fn run(ctx: &CommandContext, bind: Option<&str>) -> Result<()> {
    let mut config = ctx.config.clone();
    if let Some(bind) = bind {
        config.server.bind = bind.to_string();
    }
    let addr = config.server.socket_addr()?;

    let out = Output::new();
    out.success(&format!("Proxying {} on http://{}", ctx.backend.base_url(), addr));
    out.info(&format!("Try: curl http://{}/health", addr));

    let rt = Runtime::new()?;
    rt.block_on(server::serve(addr, ProxyState::new(ctx.backend.clone())))
}
