//! Repository file links.
//!
//! The view only builds URLs; fetching and rendering file content is the
//! file renderer's job.

use serde::Serialize;

/// A repository file as the renderer needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileLink {
    /// Last path segment, for display
    pub label: String,
    pub path: String,
    /// Browsable page on the forge
    pub blob_url: String,
    /// Raw content location
    pub raw_url: String,
}

impl FileLink {
    pub fn new(link: &str, branch: &str, path: &str) -> Self {
        let blob_url = blob_url(link, branch, path);
        Self {
            label: file_name(path).to_string(),
            path: path.to_string(),
            raw_url: raw_url(&blob_url),
            blob_url,
        }
    }
}

/// `link + "/blob/" + branch + "/" + path`
pub fn blob_url(link: &str, branch: &str, path: &str) -> String {
    format!("{}/blob/{}/{}", link, branch, path)
}

/// Raw content URL for a GitHub blob URL. Anything else is returned
/// unchanged.
pub fn raw_url(url: &str) -> String {
    match url.split_once("://github.com/") {
        Some((scheme, rest)) if url.contains("/blob/") => format!(
            "{}://raw.githubusercontent.com/{}",
            scheme,
            rest.replacen("/blob/", "/", 1)
        ),
        _ => url.to_string(),
    }
}

/// Last `/` segment of a path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
