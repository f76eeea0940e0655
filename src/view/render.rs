//! Render Derivation
//!
//! `derive(session, selection)` decides what the reader sees. It is a pure
//! function of one consistent session snapshot and the current selection.

use serde::Serialize;

use super::links::FileLink;
use super::section::Section;
use super::selection::SelectionState;
use crate::constants::messages;
use crate::stream::SessionState;
use crate::types::{AnalysisRecord, KeyFunctionality, ReadmeStatus, RelevantFile};

/// README panel states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReadmeView {
    Loading,
    Missing { message: &'static str },
    File { path: String, link: Option<FileLink> },
}

/// What to show for the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum RenderInstruction {
    Loading,
    Failed {
        heading: &'static str,
        message: String,
        home: &'static str,
    },
    Readme(ReadmeView),
    Overview {
        one_liner: Option<String>,
        summary: Option<String>,
    },
    FunctionalityDetail {
        entry: KeyFunctionality,
        link: Option<FileLink>,
    },
    FunctionalityList {
        entries: Vec<KeyFunctionality>,
    },
    FileDetail {
        section: Section,
        file: RelevantFile,
        link: Option<FileLink>,
    },
    SectionSummary {
        section: Section,
        summary: String,
        files: Vec<RelevantFile>,
    },
    /// Section data has not arrived (or never will).
    SectionPending { section: Section },
}

pub fn derive(session: &SessionState, selection: &SelectionState) -> RenderInstruction {
    if let Some(message) = &session.error {
        return RenderInstruction::Failed {
            heading: messages::ANALYSIS_FAILED,
            message: message.clone(),
            home: messages::BACK_TO_HOME,
        };
    }

    let record = &session.record;
    if !record.has_identity() {
        return RenderInstruction::Loading;
    }

    match selection.section {
        Section::Readme => RenderInstruction::Readme(readme_view(record)),
        Section::Overview => match &record.overview {
            Some(overview) => RenderInstruction::Overview {
                one_liner: overview.one_liner.clone(),
                summary: overview.summary.clone(),
            },
            None => RenderInstruction::SectionPending {
                section: Section::Overview,
            },
        },
        Section::KeyFunctionality => functionality_view(record, selection),
        section => file_section_view(record, section, selection),
    }
}

fn readme_view(record: &AnalysisRecord) -> ReadmeView {
    match &record.readme {
        ReadmeStatus::Unknown => ReadmeView::Loading,
        ReadmeStatus::Missing => ReadmeView::Missing {
            message: messages::README_MISSING,
        },
        ReadmeStatus::Present { path } => ReadmeView::File {
            path: path.clone(),
            link: file_link(record, path),
        },
    }
}

fn functionality_view(record: &AnalysisRecord, selection: &SelectionState) -> RenderInstruction {
    let Some(overview) = &record.overview else {
        return RenderInstruction::SectionPending {
            section: Section::KeyFunctionality,
        };
    };

    let selected = selection.functionality.as_deref().and_then(|label| {
        overview
            .key_functionality
            .iter()
            .find(|entry| entry.short_label == label)
    });

    match selected {
        Some(entry) => RenderInstruction::FunctionalityDetail {
            link: file_link(record, &entry.reference_file),
            entry: entry.clone(),
        },
        None => RenderInstruction::FunctionalityList {
            entries: overview.key_functionality.clone(),
        },
    }
}

fn file_section_view(
    record: &AnalysisRecord,
    section: Section,
    selection: &SelectionState,
) -> RenderInstruction {
    let Some(analysis) = section.analysis(record) else {
        return RenderInstruction::SectionPending { section };
    };

    if let Some(file) = selection
        .file
        .as_deref()
        .and_then(|path| analysis.find_file(path))
    {
        return RenderInstruction::FileDetail {
            section,
            link: file_link(record, &file.path),
            file: file.clone(),
        };
    }

    RenderInstruction::SectionSummary {
        section,
        summary: analysis.summary.clone(),
        files: analysis.relevant_files.clone(),
    }
}

fn file_link(record: &AnalysisRecord, path: &str) -> Option<FileLink> {
    record
        .blob_base()
        .map(|(link, branch)| FileLink::new(link, branch, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{StreamEvent, fold};
    use crate::view::SelectionAction;

    const START: &str = r#"{"event_type":"start","name":"acme/widgets","default_branch":"main","link":"https://github.com/acme/widgets"}"#;

    fn session(payloads: &[&str]) -> SessionState {
        fold(payloads.iter().map(|data| StreamEvent::decode(data)))
    }

    fn select(section: Section) -> SelectionState {
        SelectionState::new().with(SelectionAction::SelectSection(section))
    }

    #[test]
    fn test_loading_before_start() {
        let state = session(&[]);
        for section in Section::ALL {
            assert_eq!(derive(&state, &select(section)), RenderInstruction::Loading);
        }
    }

    #[test]
    fn test_identity_without_readme_is_loading_not_error() {
        let state = session(&[START]);
        assert_eq!(state.record.name.as_deref(), Some("acme/widgets"));
        assert_eq!(
            derive(&state, &SelectionState::new()),
            RenderInstruction::Readme(ReadmeView::Loading)
        );
    }

    #[test]
    fn test_missing_readme_message() {
        let state = session(&[
            START,
            r#"{"event_type":"readme","message":{"has_readme":false}}"#,
        ]);
        assert_eq!(
            derive(&state, &select(Section::Readme)),
            RenderInstruction::Readme(ReadmeView::Missing {
                message: messages::README_MISSING
            })
        );
    }

    #[test]
    fn test_present_readme_links_to_file() {
        let state = session(&[
            START,
            r#"{"event_type":"readme","message":{"has_readme":true,"readme":"docs/README.md"}}"#,
        ]);
        let RenderInstruction::Readme(ReadmeView::File { path, link }) =
            derive(&state, &select(Section::Readme))
        else {
            panic!("expected readme file");
        };
        assert_eq!(path, "docs/README.md");
        assert_eq!(
            link.unwrap().raw_url,
            "https://raw.githubusercontent.com/acme/widgets/main/docs/README.md"
        );
    }

    #[test]
    fn test_selected_functionality_detail() {
        let overview = r#"{"event_type":"overview","message":"{\"oneLiner\":\"Widgets\",\"keyFunctionality\":[{\"veryShortDescription\":\"Parses CLI args\",\"description\":\"Reads argv into options\",\"referenceFile\":\"src/cli.ts\"}]}"}"#;
        let state = session(&[START, overview]);
        let selection = SelectionState::new()
            .with(SelectionAction::SelectFunctionality("Parses CLI args".into()));

        let RenderInstruction::FunctionalityDetail { entry, link } = derive(&state, &selection)
        else {
            panic!("expected functionality detail");
        };
        assert_eq!(entry.description, "Reads argv into options");
        assert_eq!(
            link.unwrap().blob_url,
            "https://github.com/acme/widgets/blob/main/src/cli.ts"
        );
    }

    #[test]
    fn test_functionality_list_and_pending() {
        let state = session(&[START]);
        assert_eq!(
            derive(&state, &select(Section::KeyFunctionality)),
            RenderInstruction::SectionPending {
                section: Section::KeyFunctionality
            }
        );

        let overview = r#"{"event_type":"overview","message":"{\"keyFunctionality\":[{\"veryShortDescription\":\"a\",\"referenceFile\":\"a.rs\"},{\"veryShortDescription\":\"b\",\"referenceFile\":\"b.rs\"}]}"}"#;
        let state = session(&[START, overview]);
        let RenderInstruction::FunctionalityList { entries } =
            derive(&state, &select(Section::KeyFunctionality))
        else {
            panic!("expected list");
        };
        let labels: Vec<_> = entries.iter().map(|e| e.short_label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn test_overview_fields_are_independent() {
        let overview = r#"{"event_type":"overview","message":"{\"summary\":\"Only a summary\"}"}"#;
        let state = session(&[START, overview]);
        assert_eq!(
            derive(&state, &select(Section::Overview)),
            RenderInstruction::Overview {
                one_liner: None,
                summary: Some("Only a summary".into())
            }
        );
    }

    #[test]
    fn test_file_section_summary_and_detail() {
        let auth = r#"{"event_type":"auth_analysis","message":"{\"summary\":\"JWT\",\"relevantFiles\":[{\"filePath\":\"src/auth.rs\",\"explaination\":\"Verifies tokens\"}]}"}"#;
        let state = session(&[START, auth]);

        let RenderInstruction::SectionSummary { summary, files, .. } =
            derive(&state, &select(Section::Authentication))
        else {
            panic!("expected summary");
        };
        assert_eq!(summary, "JWT");
        assert_eq!(files.len(), 1);

        let selection = SelectionState::new().with(SelectionAction::SelectFile {
            section: Section::Authentication,
            file: "src/auth.rs".into(),
        });
        let RenderInstruction::FileDetail { file, link, .. } = derive(&state, &selection) else {
            panic!("expected file detail");
        };
        assert_eq!(file.explanation, "Verifies tokens");
        assert_eq!(link.unwrap().label, "auth.rs");

        assert_eq!(
            derive(&state, &select(Section::DataModel)),
            RenderInstruction::SectionPending {
                section: Section::DataModel
            }
        );
    }

    #[test]
    fn test_error_supersedes_everything() {
        let state = session(&[
            START,
            r#"{"event_type":"error","message":"clone failed"}"#,
            r#"{"event_type":"readme","message":{"has_readme":false}}"#,
        ]);
        let failed = RenderInstruction::Failed {
            heading: "Analysis Failed",
            message: "clone failed".into(),
            home: messages::BACK_TO_HOME,
        };
        for section in Section::ALL {
            assert_eq!(derive(&state, &select(section)), failed);
        }
        assert!(!state.record.readme.is_known());

        let before_start = session(&[r#"{"event_type":"error","message":"clone failed"}"#]);
        assert!(matches!(
            derive(&before_start, &SelectionState::new()),
            RenderInstruction::Failed { .. }
        ));
    }
}
