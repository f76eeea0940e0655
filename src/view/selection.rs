use serde::Serialize;

use super::section::Section;

/// What the reader is looking at. Independent of the stream; only user
/// actions change it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub section: Section,
    /// Path of the selected reference file
    pub file: Option<String>,
    /// Label of the selected key functionality entry
    pub functionality: Option<String>,
}

/// User selection events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    /// Switch section; drops any file or functionality selection.
    SelectSection(Section),
    /// Switch section and select a file in one step.
    SelectFile { section: Section, file: String },
    /// Open a key functionality entry.
    SelectFunctionality(String),
    /// Back out of a file or functionality detail.
    ClearFile,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: SelectionAction) {
        match action {
            SelectionAction::SelectSection(section) => {
                self.section = section;
                self.file = None;
                self.functionality = None;
            }
            SelectionAction::SelectFile { section, file } => {
                self.section = section;
                self.file = Some(file);
                self.functionality = None;
            }
            SelectionAction::SelectFunctionality(label) => {
                self.section = Section::KeyFunctionality;
                self.file = None;
                self.functionality = Some(label);
            }
            SelectionAction::ClearFile => {
                self.file = None;
                self.functionality = None;
            }
        }
    }

    /// Builder form of [`apply`](Self::apply).
    pub fn with(mut self, action: SelectionAction) -> Self {
        self.apply(action);
        self
    }
}
