//! Sidebar model: which sections can be opened, which is active, and the
//! entries listed under each.

use serde::Serialize;

use super::links::file_name;
use super::section::Section;
use super::selection::{SelectionAction, SelectionState};
use crate::types::AnalysisRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub section: Section,
    pub title: &'static str,
    pub enabled: bool,
    pub active: bool,
    pub children: Vec<NavChild>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavChild {
    pub label: String,
    pub selected: bool,
    /// Selection event fired when the child is clicked
    #[serde(skip)]
    pub action: SelectionAction,
}

pub fn sidebar(record: &AnalysisRecord, selection: &SelectionState) -> Vec<NavEntry> {
    Section::ALL
        .into_iter()
        .map(|section| NavEntry {
            section,
            title: section.title(),
            enabled: is_enabled(record, section),
            active: selection.section == section,
            children: children(record, section, selection),
        })
        .collect()
}

fn is_enabled(record: &AnalysisRecord, section: Section) -> bool {
    match section {
        Section::Readme => true,
        Section::Overview | Section::KeyFunctionality => record.overview.is_some(),
        section => section.analysis(record).is_some(),
    }
}

fn children(record: &AnalysisRecord, section: Section, selection: &SelectionState) -> Vec<NavChild> {
    let on_section = selection.section == section;

    if section == Section::KeyFunctionality {
        return record
            .overview
            .iter()
            .flat_map(|overview| &overview.key_functionality)
            .map(|entry| NavChild {
                label: entry.short_label.clone(),
                selected: on_section
                    && selection.functionality.as_deref() == Some(entry.short_label.as_str()),
                action: SelectionAction::SelectFunctionality(entry.short_label.clone()),
            })
            .collect();
    }

    section
        .analysis(record)
        .map(|analysis| {
            analysis
                .relevant_files
                .iter()
                .map(|file| NavChild {
                    label: file_name(&file.path).to_string(),
                    selected: on_section && selection.file.as_deref() == Some(file.path.as_str()),
                    action: SelectionAction::SelectFile {
                        section,
                        file: file.path.clone(),
                    },
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyFunctionality, Overview, RelevantFile, SectionAnalysis};

    fn record() -> AnalysisRecord {
        AnalysisRecord {
            name: Some("acme/widgets".into()),
            overview: Some(Overview {
                key_functionality: vec![KeyFunctionality {
                    short_label: "Parses CLI args".into(),
                    reference_file: "src/cli.ts".into(),
                    ..Default::default()
                }],
                ..Default::default()
            }),
            entry_points: Some(SectionAnalysis {
                summary: "main".into(),
                relevant_files: vec![RelevantFile {
                    path: "src/bin/main.rs".into(),
                    ..Default::default()
                }],
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_enabled_follows_available_data() {
        let entries = sidebar(&record(), &SelectionState::new());
        let enabled: Vec<_> = entries.iter().map(|e| (e.section, e.enabled)).collect();
        assert_eq!(
            enabled,
            vec![
                (Section::Readme, true),
                (Section::Overview, true),
                (Section::KeyFunctionality, true),
                (Section::EntryPoints, true),
                (Section::Authentication, false),
                (Section::DataModel, false),
            ]
        );
        assert!(entries[0].active);
    }

    #[test]
    fn test_children_mark_selection() {
        let selection = SelectionState::new().with(SelectionAction::SelectFile {
            section: Section::EntryPoints,
            file: "src/bin/main.rs".into(),
        });
        let entries = sidebar(&record(), &selection);

        let entry_points = &entries[3];
        assert!(entry_points.active);
        assert_eq!(entry_points.children[0].label, "main.rs");
        assert!(entry_points.children[0].selected);

        let functionality = &entries[2];
        assert_eq!(functionality.children[0].label, "Parses CLI args");
        assert!(!functionality.children[0].selected);
    }

    #[test]
    fn test_child_action_selects_it() {
        let entries = sidebar(&record(), &SelectionState::new());
        let action = entries[2].children[0].action.clone();
        let selection = SelectionState::new().with(action);
        let entries = sidebar(&record(), &selection);
        assert!(entries[2].children[0].selected);
    }
}
