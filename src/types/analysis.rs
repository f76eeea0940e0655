//! Repository Analysis Types
//!
//! The accumulating result of one analysis session, plus the structures the
//! backend streams into it. Serde names follow the backend wire format.

use serde::{Deserialize, Serialize};

/// Accumulating result for one repository analysis session.
///
/// Every field is optional because the record is assembled incrementally
/// from stream events that arrive in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(rename = "repo_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub readme: ReadmeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<Overview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_points: Option<SectionAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_analysis: Option<SectionAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_model_analysis: Option<SectionAnalysis>,
}

impl AnalysisRecord {
    /// Overwrite the identity fields, leaving analysis fields untouched.
    pub fn set_identity(&mut self, identity: RepoIdentity) {
        self.id = identity.id;
        self.name = identity.name;
        self.owner = identity.owner;
        self.link = identity.link;
        self.default_branch = identity.default_branch;
        self.description = identity.description;
    }

    /// Whether `start` has delivered a repository name yet.
    pub fn has_identity(&self) -> bool {
        self.name.is_some()
    }

    /// Analysis fields that are currently populated, in display order.
    pub fn available_fields(&self) -> Vec<AnalysisField> {
        let mut fields = Vec::new();
        if self.readme.is_known() {
            fields.push(AnalysisField::Readme);
        }
        if self.overview.is_some() {
            fields.push(AnalysisField::Overview);
        }
        if self.entry_points.is_some() {
            fields.push(AnalysisField::EntryPoints);
        }
        if self.auth_analysis.is_some() {
            fields.push(AnalysisField::AuthAnalysis);
        }
        if self.data_model_analysis.is_some() {
            fields.push(AnalysisField::DataModelAnalysis);
        }
        fields
    }

    /// Repository link and default branch, when both are known.
    pub fn blob_base(&self) -> Option<(&str, &str)> {
        Some((self.link.as_deref()?, self.default_branch.as_deref()?))
    }
}

/// Independently-arriving analysis fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisField {
    Readme,
    Overview,
    EntryPoints,
    AuthAnalysis,
    DataModelAnalysis,
}

impl std::fmt::Display for AnalysisField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisField::Readme => write!(f, "readme"),
            AnalysisField::Overview => write!(f, "overview"),
            AnalysisField::EntryPoints => write!(f, "entry points"),
            AnalysisField::AuthAnalysis => write!(f, "authentication analysis"),
            AnalysisField::DataModelAnalysis => write!(f, "data model analysis"),
        }
    }
}

/// Repository identity metadata delivered by the `start` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoIdentity {
    #[serde(rename = "repo_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// README availability: unknown until the `readme` event arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReadmeStatus {
    #[default]
    Unknown,
    Missing,
    Present { path: String },
}

impl ReadmeStatus {
    pub fn is_known(&self) -> bool {
        !matches!(self, ReadmeStatus::Unknown)
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            ReadmeStatus::Present { path } => Some(path),
            _ => None,
        }
    }
}

/// Structured repository summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    #[serde(rename = "oneLiner", default, skip_serializing_if = "Option::is_none")]
    pub one_liner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "keyFunctionality", default)]
    pub key_functionality: Vec<KeyFunctionality>,
}

/// One entry of the overview's key functionality list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFunctionality {
    #[serde(rename = "veryShortDescription")]
    pub short_label: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "referenceFile")]
    pub reference_file: String,
}

/// Entry points, authentication and data model analyses share this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionAnalysis {
    #[serde(default)]
    pub summary: String,
    #[serde(rename = "relevantFiles", default)]
    pub relevant_files: Vec<RelevantFile>,
}

impl SectionAnalysis {
    pub fn find_file(&self, path: &str) -> Option<&RelevantFile> {
        self.relevant_files.iter().find(|f| f.path == path)
    }
}

/// A file referenced by a section analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevantFile {
    #[serde(rename = "filePath")]
    pub path: String,
    // The backend spells it "explaination".
    #[serde(rename = "explaination", alias = "explanation", default)]
    pub explanation: String,
    #[serde(rename = "cleanName", default, skip_serializing_if = "Option::is_none")]
    pub clean_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_wire_names() {
        let overview: Overview = serde_json::from_str(
            r#"{"oneLiner":"A widget kit","summary":"Longer text","keyFunctionality":[
                {"veryShortDescription":"Parses CLI args","description":"Reads argv","referenceFile":"src/cli.ts"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(overview.one_liner.as_deref(), Some("A widget kit"));
        assert_eq!(overview.key_functionality.len(), 1);
        assert_eq!(overview.key_functionality[0].short_label, "Parses CLI args");
        assert_eq!(overview.key_functionality[0].reference_file, "src/cli.ts");
    }

    #[test]
    fn test_relevant_file_accepts_both_spellings() {
        let misspelled: RelevantFile =
            serde_json::from_str(r#"{"filePath":"a.rs","explaination":"x"}"#).unwrap();
        let correct: RelevantFile =
            serde_json::from_str(r#"{"filePath":"a.rs","explanation":"x"}"#).unwrap();
        assert_eq!(misspelled, correct);
        assert_eq!(correct.explanation, "x");
    }

    #[test]
    fn test_set_identity_keeps_analysis_fields() {
        let mut record = AnalysisRecord {
            overview: Some(Overview::default()),
            ..Default::default()
        };
        record.set_identity(RepoIdentity {
            name: Some("acme/widgets".to_string()),
            ..Default::default()
        });

        assert!(record.has_identity());
        assert!(record.overview.is_some());
        assert_eq!(record.available_fields(), vec![AnalysisField::Overview]);
    }

    #[test]
    fn test_blob_base_requires_link_and_branch() {
        let mut record = AnalysisRecord {
            link: Some("https://github.com/acme/widgets".to_string()),
            ..Default::default()
        };
        assert_eq!(record.blob_base(), None);

        record.default_branch = Some("main".to_string());
        assert_eq!(
            record.blob_base(),
            Some(("https://github.com/acme/widgets", "main"))
        );
    }
}
