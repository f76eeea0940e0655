//! Session Reducer
//!
//! Folds decoded stream events into a [`SessionState`]. Each event touches
//! exactly one field of the record, so fields arrive independently and in any
//! order. After a terminal event the state is frozen.
//!
//! | event_type            | effect                                   |
//! |-----------------------|------------------------------------------|
//! | `start`               | identity fields                          |
//! | `overview`            | `overview`                               |
//! | `readme`              | `readme`                                 |
//! | `auth_analysis`       | `auth_analysis`                          |
//! | `data_model_analysis` | `data_model_analysis`                    |
//! | `entry_points`        | `entry_points`                           |
//! | `completed`           | status → completed, close                |
//! | `error`               | session error, status → failed, close    |
//! | anything else         | ignored                                  |

use serde::Serialize;
use tracing::{debug, info, warn};

use super::event::StreamEvent;
use crate::types::AnalysisRecord;

/// Lifecycle of one analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Streaming,
    /// `completed` received
    Completed,
    /// `error` received
    Failed,
    /// Stream ended without a terminal event
    Disconnected,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Streaming)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Streaming => write!(f, "streaming"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Failed => write!(f, "failed"),
            SessionStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// A payload that could not be decoded. The field it targeted stays unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeFailure {
    pub event_type: Option<String>,
    pub reason: String,
}

/// Whether the consumer should keep reading after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

/// Everything the stream has told us about a session so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub record: AnalysisRecord,
    /// Session-level error from an `error` event
    pub error: Option<String>,
    pub status: SessionStatus,
    /// Non-fatal per-field decode failures
    pub decode_failures: Vec<DecodeFailure>,
    /// Transport errors observed on the connection
    pub transport_errors: usize,
    /// Message of the `completed` event, if any
    pub completion_message: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one event.
    pub fn apply(&mut self, event: StreamEvent) -> Flow {
        if self.status.is_terminal() {
            debug!(
                "Ignoring '{}' event after session became {}",
                event.event_type(),
                self.status
            );
            return Flow::Close;
        }

        match event {
            StreamEvent::Start(identity) => {
                info!(
                    "Analysis started for {}",
                    identity.name.as_deref().unwrap_or("<unnamed repository>")
                );
                self.record.set_identity(identity);
            }
            StreamEvent::Overview(overview) => self.record.overview = Some(overview),
            StreamEvent::Readme(readme) => self.record.readme = readme,
            StreamEvent::AuthAnalysis(section) => self.record.auth_analysis = Some(section),
            StreamEvent::DataModelAnalysis(section) => {
                self.record.data_model_analysis = Some(section)
            }
            StreamEvent::EntryPoints(section) => self.record.entry_points = Some(section),
            StreamEvent::Completed(message) => {
                info!("Analysis completed");
                self.completion_message = message;
                self.status = SessionStatus::Completed;
                return Flow::Close;
            }
            StreamEvent::Error(message) => {
                warn!("Analysis failed: {}", message);
                self.error = Some(message);
                self.status = SessionStatus::Failed;
                return Flow::Close;
            }
            StreamEvent::Unknown(event_type) => {
                debug!("Unknown event type: {}", event_type);
            }
            StreamEvent::Malformed { event_type, reason } => {
                warn!(
                    "Skipping undecodable '{}' event: {}",
                    event_type.as_deref().unwrap_or("<unknown>"),
                    reason
                );
                self.decode_failures.push(DecodeFailure { event_type, reason });
            }
        }

        Flow::Continue
    }

    /// Note a connection-level error. Does not touch the session error.
    pub fn record_transport_error(&mut self, reason: &str) {
        warn!("Analysis stream transport error: {}", reason);
        self.transport_errors += 1;
    }

    /// The connection ended. A session without a terminal event is marked
    /// disconnected so the record is treated as final.
    pub fn mark_closed(&mut self) {
        if !self.status.is_terminal() {
            info!("Analysis stream closed before a terminal event");
            self.status = SessionStatus::Disconnected;
        }
    }
}

/// Fold a sequence of events into a fresh session state.
pub fn fold<I>(events: I) -> SessionState
where
    I: IntoIterator<Item = StreamEvent>,
{
    let mut state = SessionState::new();
    for event in events {
        state.apply(event);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        KeyFunctionality, Overview, ReadmeStatus, RelevantFile, RepoIdentity, SectionAnalysis,
    };
    use proptest::prelude::*;

    fn start() -> StreamEvent {
        StreamEvent::Start(RepoIdentity {
            id: Some("abc".into()),
            name: Some("acme/widgets".into()),
            default_branch: Some("main".into()),
            link: Some("https://github.com/acme/widgets".into()),
            ..Default::default()
        })
    }

    fn overview() -> Overview {
        Overview {
            one_liner: Some("Widgets".into()),
            summary: Some("A widget toolkit".into()),
            key_functionality: vec![KeyFunctionality {
                short_label: "Parses CLI args".into(),
                description: "Reads argv".into(),
                reference_file: "src/cli.ts".into(),
            }],
        }
    }

    fn section(summary: &str) -> SectionAnalysis {
        SectionAnalysis {
            summary: summary.into(),
            relevant_files: vec![RelevantFile {
                path: format!("src/{}.rs", summary),
                explanation: summary.into(),
                ..Default::default()
            }],
        }
    }

    fn field_events() -> Vec<StreamEvent> {
        vec![
            StreamEvent::Overview(overview()),
            StreamEvent::Readme(ReadmeStatus::Present {
                path: "README.md".into(),
            }),
            StreamEvent::AuthAnalysis(section("auth")),
            StreamEvent::DataModelAnalysis(section("models")),
            StreamEvent::EntryPoints(section("main")),
        ]
    }

    #[test]
    fn test_start_sets_identity_only() {
        let state = fold([start()]);
        assert_eq!(state.record.name.as_deref(), Some("acme/widgets"));
        assert_eq!(state.record.readme, ReadmeStatus::Unknown);
        assert!(state.record.overview.is_none());
        assert_eq!(state.status, SessionStatus::Streaming);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_overview_applied_twice_is_idempotent() {
        let once = fold([start(), StreamEvent::Overview(overview())]);
        let twice = fold([
            start(),
            StreamEvent::Overview(overview()),
            StreamEvent::Overview(overview()),
        ]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_other_events_never_clear_a_field() {
        let mut state = fold([start(), StreamEvent::AuthAnalysis(section("auth"))]);
        for event in [
            start(),
            StreamEvent::Overview(overview()),
            StreamEvent::Readme(ReadmeStatus::Missing),
            StreamEvent::DataModelAnalysis(section("models")),
            StreamEvent::EntryPoints(section("main")),
            StreamEvent::Unknown("progress".into()),
            StreamEvent::Malformed {
                event_type: Some("auth_analysis".into()),
                reason: "bad".into(),
            },
        ] {
            state.apply(event);
        }
        assert_eq!(state.record.auth_analysis, Some(section("auth")));
    }

    #[test]
    fn test_fields_before_start_survive_start() {
        let state = fold([StreamEvent::Overview(overview()), start()]);
        assert!(state.record.has_identity());
        assert_eq!(state.record.overview, Some(overview()));
    }

    #[test]
    fn test_completed_freezes_state() {
        let mut state = fold([start(), StreamEvent::Completed(Some("done".into()))]);
        assert_eq!(state.status, SessionStatus::Completed);
        assert_eq!(state.completion_message.as_deref(), Some("done"));

        let before = state.clone();
        assert_eq!(state.apply(StreamEvent::Overview(overview())), Flow::Close);
        assert_eq!(state.apply(StreamEvent::Error("late".into())), Flow::Close);
        assert_eq!(state, before);
    }

    #[test]
    fn test_error_sets_session_error_and_freezes() {
        let mut state = SessionState::new();
        assert_eq!(state.apply(start()), Flow::Continue);
        assert_eq!(
            state.apply(StreamEvent::Error("clone failed".into())),
            Flow::Close
        );
        assert_eq!(state.error.as_deref(), Some("clone failed"));
        assert_eq!(state.status, SessionStatus::Failed);

        state.apply(StreamEvent::EntryPoints(section("main")));
        assert!(state.record.entry_points.is_none());
    }

    #[test]
    fn test_decode_failure_skips_field_only() {
        let state = fold([
            start(),
            StreamEvent::decode(r#"{"event_type":"auth_analysis","message":"{not json"}"#),
            StreamEvent::EntryPoints(section("main")),
        ]);

        assert!(state.record.auth_analysis.is_none());
        assert_eq!(state.record.entry_points, Some(section("main")));
        assert!(state.error.is_none());
        assert_eq!(state.status, SessionStatus::Streaming);
        assert_eq!(state.decode_failures.len(), 1);
        assert_eq!(
            state.decode_failures[0].event_type.as_deref(),
            Some("auth_analysis")
        );
    }

    #[test]
    fn test_transport_error_is_not_a_session_error() {
        let mut state = fold([start()]);
        state.record_transport_error("connection reset");
        assert_eq!(state.transport_errors, 1);
        assert!(state.error.is_none());
        assert_eq!(state.status, SessionStatus::Streaming);

        state.mark_closed();
        assert_eq!(state.status, SessionStatus::Disconnected);
    }

    #[test]
    fn test_mark_closed_keeps_terminal_status() {
        let mut state = fold([StreamEvent::Completed(None)]);
        state.mark_closed();
        assert_eq!(state.status, SessionStatus::Completed);
    }

    proptest! {
        #[test]
        fn prop_field_merge_is_order_independent(
            subset in proptest::sample::subsequence((0..5usize).collect::<Vec<_>>(), 0..=5)
                .prop_shuffle()
        ) {
            let events = field_events();
            let mut stream = vec![start()];
            stream.extend(subset.iter().map(|&i| events[i].clone()));
            let state = fold(stream);

            let expected = fold(
                std::iter::once(start()).chain(
                    (0..5).filter(|i| subset.contains(i)).map(|i| events[i].clone()),
                ),
            );
            prop_assert_eq!(&state, &expected);

            prop_assert_eq!(state.record.overview.is_some(), subset.contains(&0));
            prop_assert_eq!(state.record.readme.is_known(), subset.contains(&1));
            prop_assert_eq!(state.record.auth_analysis.is_some(), subset.contains(&2));
            prop_assert_eq!(state.record.data_model_analysis.is_some(), subset.contains(&3));
            prop_assert_eq!(state.record.entry_points.is_some(), subset.contains(&4));
        }

        #[test]
        fn prop_repeated_events_are_idempotent(repeats in 1usize..4) {
            let once = fold(std::iter::once(start()).chain(field_events()));
            let mut stream = vec![start()];
            for event in field_events() {
                stream.extend(std::iter::repeat_n(event, repeats));
            }
            prop_assert_eq!(fold(stream), once);
        }
    }
}
