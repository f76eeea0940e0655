//! Stream Progress
//!
//! Turns successive session snapshots into one-shot progress events: the
//! repository identity, each analysis field the first time it arrives,
//! decode failures, and the final status.

use std::collections::HashSet;
use std::time::Instant;

use console::style;

use crate::stream::{SessionState, SessionStatus};
use crate::types::AnalysisField;

/// Analysis fields a complete session delivers
const TOTAL_FIELDS: usize = 5;

/// Progress event types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// `start` delivered the repository identity
    Started { name: String, branch: Option<String> },
    /// An analysis field arrived for the first time
    FieldArrived {
        field: AnalysisField,
        received: usize,
    },
    /// A payload was skipped
    DecodeFailed { event_type: String, reason: String },
    /// Session reached a terminal status
    Finished {
        status: SessionStatus,
        received: usize,
        elapsed_secs: u64,
    },
}

/// Remembers what has already been reported for one session.
pub struct ProgressTracker {
    started: Instant,
    identity_reported: bool,
    fields: HashSet<AnalysisField>,
    failures_reported: usize,
    finished: bool,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            identity_reported: false,
            fields: HashSet::new(),
            failures_reported: 0,
            finished: false,
        }
    }

    /// Events not yet reported for this snapshot.
    pub fn observe(&mut self, state: &SessionState) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        let record = &state.record;

        if !self.identity_reported
            && let Some(name) = &record.name
        {
            self.identity_reported = true;
            events.push(ProgressEvent::Started {
                name: name.clone(),
                branch: record.default_branch.clone(),
            });
        }

        for field in record.available_fields() {
            if self.fields.insert(field) {
                events.push(ProgressEvent::FieldArrived {
                    field,
                    received: self.fields.len(),
                });
            }
        }

        for failure in state.decode_failures.iter().skip(self.failures_reported) {
            events.push(ProgressEvent::DecodeFailed {
                event_type: failure
                    .event_type
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
                reason: failure.reason.clone(),
            });
        }
        self.failures_reported = state.decode_failures.len();

        if !self.finished && state.status.is_terminal() {
            self.finished = true;
            events.push(ProgressEvent::Finished {
                status: state.status,
                received: self.fields.len(),
                elapsed_secs: self.started.elapsed().as_secs(),
            });
        }

        events
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Console progress renderer
pub struct ConsoleRenderer;

impl ConsoleRenderer {
    /// One line per event
    pub fn render(event: &ProgressEvent) -> String {
        match event {
            ProgressEvent::Started { name, branch } => format!(
                "{} Analyzing {}{}",
                style("▶").cyan(),
                style(name).bold(),
                branch
                    .as_deref()
                    .map(|b| format!(" ({})", b))
                    .unwrap_or_default()
            ),
            ProgressEvent::FieldArrived { field, received } => format!(
                "{} {} {} received",
                style("✓").green(),
                render_progress_bar(*received, TOTAL_FIELDS, 10),
                field
            ),
            ProgressEvent::DecodeFailed { event_type, reason } => format!(
                "{} Skipped '{}' payload: {}",
                style("⚠").yellow(),
                event_type,
                reason
            ),
            ProgressEvent::Finished {
                status,
                received,
                elapsed_secs,
            } => {
                let marker = match status {
                    SessionStatus::Completed => style("✓").green(),
                    SessionStatus::Failed => style("✗").red(),
                    _ => style("⚠").yellow(),
                };
                format!(
                    "{} Analysis {} in {} ({}/{} sections)",
                    marker,
                    status,
                    format_duration(*elapsed_secs),
                    received,
                    TOTAL_FIELDS
                )
            }
        }
    }

    pub fn print(event: &ProgressEvent) {
        eprintln!("{}", Self::render(event));
    }
}

/// Render a simple progress bar
fn render_progress_bar(completed: usize, total: usize, width: usize) -> String {
    if total == 0 {
        return format!("[{}]", " ".repeat(width));
    }

    let progress = (completed as f32 / total as f32).min(1.0);
    let filled = (progress * width as f32) as usize;
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Format duration as human-readable string
fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
