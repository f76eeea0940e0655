use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{AnalysisRecord, SectionAnalysis};

/// Top-level content views of a repository wiki.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    #[default]
    Readme,
    Overview,
    KeyFunctionality,
    EntryPoints,
    Authentication,
    DataModel,
}

impl Section {
    /// Sidebar order.
    pub const ALL: [Section; 6] = [
        Section::Readme,
        Section::Overview,
        Section::KeyFunctionality,
        Section::EntryPoints,
        Section::Authentication,
        Section::DataModel,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Section::Readme => "readme",
            Section::Overview => "overview",
            Section::KeyFunctionality => "key-functionality",
            Section::EntryPoints => "entry-points",
            Section::Authentication => "authentication",
            Section::DataModel => "data-model",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Readme => "README",
            Section::Overview => "Overview",
            Section::KeyFunctionality => "Key Functionality",
            Section::EntryPoints => "Entry Points",
            Section::Authentication => "Authentication",
            Section::DataModel => "Data Model",
        }
    }

    /// Sections backed by a [`SectionAnalysis`] with reference files.
    pub fn has_files(&self) -> bool {
        matches!(
            self,
            Section::EntryPoints | Section::Authentication | Section::DataModel
        )
    }

    /// The analysis backing a file section, if it has arrived.
    pub fn analysis<'a>(&self, record: &'a AnalysisRecord) -> Option<&'a SectionAnalysis> {
        match self {
            Section::EntryPoints => record.entry_points.as_ref(),
            Section::Authentication => record.auth_analysis.as_ref(),
            Section::DataModel => record.data_model_analysis.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Section::ALL
            .into_iter()
            .find(|section| section.slug() == normalized)
            .ok_or_else(|| {
                let expected: Vec<_> = Section::ALL.iter().map(Section::slug).collect();
                format!(
                    "Unknown section '{}' (expected one of: {})",
                    s,
                    expected.join(", ")
                )
            })
    }
}
