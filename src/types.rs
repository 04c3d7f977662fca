//! Report types shared by the CLI output and `--json` mode.

use crate::resolve::PublishDecision;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One resolved document, flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Path relative to the content root when the document lives under it.
    pub path: String,
    /// `title` from the header, or the file stem as fallback
    pub title: String,
    /// Effective slug, including review slug overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    pub pre_published: bool,
    /// Header was (or, in check mode, would be) rewritten
    pub written: bool,
}

impl DocumentReport {
    pub fn from_decision(path: &Path, root: &Path, decision: &PublishDecision) -> Self {
        let display_path = path.strip_prefix(root).unwrap_or(path);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path: display_path.to_string_lossy().into_owned(),
            title: decision
                .meta
                .title()
                .map(str::to_string)
                .unwrap_or(stem),
            slug: decision.meta.slug().map(str::to_string),
            published: decision.meta.published(),
            pre_published: decision.pre_published,
            written: decision.written,
        }
    }
}

/// Totals over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub documents: usize,
    pub pre_published: usize,
    pub written: usize,
}

impl RunSummary {
    pub fn from_reports(reports: &[DocumentReport]) -> Self {
        Self {
            documents: reports.len(),
            pre_published: reports.iter().filter(|r| r.pre_published).count(),
            written: reports.iter().filter(|r| r.written).count(),
        }
    }
}
