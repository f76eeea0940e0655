//! Terminal rendering of view instructions.
//!
//! Text output mirrors the panels a browser would show. File content is
//! fetched on demand; markdown is printed as-is, everything else gets a
//! line-number gutter.

use tracing::warn;

use super::output::Output;
use crate::client::FileFetcher;
use crate::view::{FileLink, NavEntry, ReadmeView, RenderInstruction};

/// How fetched file content is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Markdown,
    Code,
}

impl ContentKind {
    pub fn for_path(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".md") || lower.ends_with(".markdown") || lower.ends_with(".mdx") {
            ContentKind::Markdown
        } else {
            ContentKind::Code
        }
    }
}

pub struct Presenter {
    out: Output,
    fetcher: Option<FileFetcher>,
}

impl Presenter {
    /// Without a fetcher only links are printed.
    pub fn new(fetcher: Option<FileFetcher>) -> Self {
        Self {
            out: Output::new(),
            fetcher,
        }
    }

    pub fn sidebar(&self, entries: &[NavEntry]) {
        self.out.header("Sections");
        for entry in entries {
            let marker = if entry.active { "▸" } else { " " };
            let state = if entry.enabled { "" } else { "(pending)" };
            self.out.bullet(&format!("{} {}", marker, entry.title), state);
            for child in &entry.children {
                let marker = if child.selected { "▸" } else { "-" };
                self.out.text(&format!("      {} {}", marker, child.label));
            }
        }
    }

    pub async fn show(&self, instruction: &RenderInstruction) {
        match instruction {
            RenderInstruction::Loading => self.out.info("Analyzing repository..."),
            RenderInstruction::Failed {
                heading,
                message,
                home,
            } => {
                self.out.section(heading);
                self.out.error(message);
                self.out.emphasis(home);
            }
            RenderInstruction::Readme(view) => self.readme(view).await,
            RenderInstruction::Overview { one_liner, summary } => {
                self.out.section("Overview");
                if let Some(one_liner) = one_liner {
                    self.out.emphasis(one_liner);
                }
                if let Some(summary) = summary {
                    self.out.text(summary);
                }
            }
            RenderInstruction::FunctionalityList { entries } => {
                self.out.section("Key Functionality");
                for entry in entries {
                    self.out.bullet(&entry.short_label, &entry.description);
                }
            }
            RenderInstruction::FunctionalityDetail { entry, link } => {
                self.out.section(&entry.short_label);
                self.out.text(&entry.description);
                self.out.bullet("Reference", &entry.reference_file);
                self.file(&entry.reference_file, link.as_ref()).await;
            }
            RenderInstruction::SectionSummary {
                section,
                summary,
                files,
            } => {
                self.out.section(section.title());
                self.out.text(summary);
                if !files.is_empty() {
                    self.out.text("");
                    for file in files {
                        let label = file.clean_name.as_deref().unwrap_or(&file.path);
                        self.out.bullet(label, &file.path);
                    }
                }
            }
            RenderInstruction::FileDetail {
                section,
                file,
                link,
            } => {
                self.out
                    .section(&format!("{} / {}", section.title(), file.path));
                if !file.explanation.is_empty() {
                    self.out.text(&file.explanation);
                }
                self.file(&file.path, link.as_ref()).await;
            }
            RenderInstruction::SectionPending { section } => {
                self.out.section(section.title());
                self.out
                    .warning("This section has not been analyzed for this repository.");
            }
        }
    }

    async fn readme(&self, view: &ReadmeView) {
        self.out.section("README");
        match view {
            ReadmeView::Loading => self.out.info("Waiting for README..."),
            ReadmeView::Missing { message } => self.out.warning(message),
            ReadmeView::File { path, link } => self.file(path, link.as_ref()).await,
        }
    }

    async fn file(&self, path: &str, link: Option<&FileLink>) {
        let Some(link) = link else {
            self.out.warning(&format!("No repository link for {}", path));
            return;
        };

        self.out.link(&link.label, &link.blob_url);

        let Some(fetcher) = &self.fetcher else {
            return;
        };

        match fetcher.fetch(link).await {
            Ok(content) => {
                self.out.text("");
                match ContentKind::for_path(path) {
                    ContentKind::Markdown => self.out.text(&content),
                    ContentKind::Code => self.out.code(&content),
                }
            }
            Err(e) => {
                warn!("Could not load {}: {}", link.raw_url, e);
                self.out
                    .warning(&format!("Could not load {} ({})", link.label, e.category()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kind() {
        assert_eq!(ContentKind::for_path("README.md"), ContentKind::Markdown);
        assert_eq!(ContentKind::for_path("docs/Guide.MDX"), ContentKind::Markdown);
        assert_eq!(ContentKind::for_path("src/main.rs"), ContentKind::Code);
        assert_eq!(ContentKind::for_path("Makefile"), ContentKind::Code);
    }
}
