//! Watch Command
//!
//! Follow an analysis session, then render the selected sections.
//!
//! Usage:
//!   repowiki watch <session-id> [-s overview -s entry-points] [--file PATH]
//!   repowiki watch <session-id> --functionality LABEL [-f json]

use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::Runtime;
use tracing::warn;

use crate::cli::progress::{ConsoleRenderer, ProgressTracker};
use crate::cli::ui::Presenter;
use crate::cli::util::CommandContext;
use crate::stream::{SessionState, SessionStatus, StreamConsumer, StreamPort};
use crate::types::{RepoWikiError, Result, SessionId};
use crate::view::{RenderInstruction, Section, SelectionAction, SelectionState, derive, sidebar};

/// What to render once the session settles
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    /// Sections to render; all sections when empty
    pub sections: Vec<Section>,
    /// Reference file within the (single) selected file section
    pub file: Option<String>,
    /// Key functionality entry label
    pub functionality: Option<String>,
    /// Print links only, without fetching file content
    pub no_content: bool,
    /// Output format: text, json
    pub format: String,
    /// Print the section navigation before the panels
    pub nav: bool,
}

impl ViewOptions {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }

    /// Selection states to render, in order.
    pub fn selections(&self) -> Result<Vec<SelectionState>> {
        if let Some(label) = &self.functionality {
            return Ok(vec![
                SelectionState::new().with(SelectionAction::SelectFunctionality(label.clone())),
            ]);
        }

        if let Some(file) = &self.file {
            let section = match self.sections.as_slice() {
                [section] if section.has_files() => *section,
                _ => {
                    return Err(RepoWikiError::Config(
                        "--file needs exactly one of: entry-points, authentication, data-model"
                            .to_string(),
                    ));
                }
            };
            return Ok(vec![SelectionState::new().with(SelectionAction::SelectFile {
                section,
                file: file.clone(),
            })]);
        }

        let sections: &[Section] = if self.sections.is_empty() {
            &Section::ALL
        } else {
            &self.sections
        };

        Ok(sections
            .iter()
            .map(|section| SelectionState::new().with(SelectionAction::SelectSection(*section)))
            .collect())
    }
}

#[derive(Serialize)]
struct RenderedView<'a> {
    selection: &'a SelectionState,
    render: RenderInstruction,
}

#[derive(Serialize)]
struct WatchReport<'a> {
    session_id: &'a str,
    session: &'a SessionState,
    views: Vec<RenderedView<'a>>,
}

pub fn run(ctx: &CommandContext, session_id: &str, options: &ViewOptions) -> Result<()> {
    let session_id = SessionId::new(session_id);
    let rt = Runtime::new()?;
    rt.block_on(watch(ctx, &session_id, options))
}

/// Follow the session and render it. Shared with `analyze`.
pub async fn watch(
    ctx: &CommandContext,
    session_id: &SessionId,
    options: &ViewOptions,
) -> Result<()> {
    let selections = options.selections()?;
    let state = follow(ctx.stream_port(), session_id, !options.is_json()).await;

    if options.is_json() {
        let views = selections
            .iter()
            .map(|selection| RenderedView {
                selection,
                render: derive(&state, selection),
            })
            .collect();
        let report = WatchReport {
            session_id: session_id.as_str(),
            session: &state,
            views,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let fetcher = if options.no_content {
            None
        } else {
            Some(ctx.file_fetcher()?)
        };
        let presenter = Presenter::new(fetcher);

        if options.nav
            && let Some(first) = selections.first()
        {
            presenter.sidebar(&sidebar(&state.record, first));
        }
        for selection in &selections {
            presenter.show(&derive(&state, selection)).await;
        }
    }

    match state.error {
        Some(message) => Err(RepoWikiError::Stream(message)),
        None => Ok(()),
    }
}

/// Consume the stream until it settles or the user interrupts, reporting
/// progress along the way. Returns the last snapshot.
pub async fn follow(
    port: Arc<dyn StreamPort>,
    session_id: &SessionId,
    report: bool,
) -> SessionState {
    let mut handle = StreamConsumer::open(port, session_id.as_str());
    let mut tracker = ProgressTracker::new();

    loop {
        tokio::select! {
            changed = handle.changed() => {
                let Some(state) = changed else {
                    return handle.snapshot();
                };
                if report {
                    tracker.observe(&state).iter().for_each(ConsoleRenderer::print);
                }
                if state.status.is_terminal() {
                    return state;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted; closing analysis stream for {}", session_id);
                handle.close();
                let mut state = handle.snapshot();
                if state.status == SessionStatus::Streaming {
                    state.mark_closed();
                }
                return state;
            }
        }
    }
}
