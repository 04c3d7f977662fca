//! CLI output formatting.
//!
//! Output is information-first: each document leads with its positional index
//! and title, with the source path and resolved state as indented context
//! lines.
//!
//! ```text
//! 001 Hello World
//!     Source: blog/hello.md
//!     Slug: ___UNPUBLISHED___m1tyl1c0_Q8dK...
//!     State: pre-published, rewritten
//! 002 About
//!     Source: about.md
//!     Slug: about
//!     State: published
//!
//! Resolved 2 documents: 1 pre-published, 1 rewritten
//! ```
//!
//! In check mode "rewritten" reads "would rewrite" and nothing is written.
//!
//! Each `format_*` function returns lines for testability; `print_*` wrappers
//! write them to stdout.

use crate::types::{DocumentReport, RunSummary};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human label for the resolved state of one document.
fn state_label(report: &DocumentReport, dry_run: bool) -> String {
    let visibility = if report.pre_published {
        "pre-published"
    } else {
        match report.published {
            Some(true) => "published",
            Some(false) => "unpublished",
            None => "no publish flag",
        }
    };
    if report.written {
        let action = if dry_run { "would rewrite" } else { "rewritten" };
        format!("{visibility}, {action}")
    } else {
        visibility.to_string()
    }
}

fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Format the per-document report followed by a summary line.
pub fn format_reports(reports: &[DocumentReport], dry_run: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, report) in reports.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), report.title));
        lines.push(format!("{}Source: {}", indent(1), report.path));
        if let Some(slug) = &report.slug {
            lines.push(format!("{}Slug: {}", indent(1), slug));
        }
        lines.push(format!("{}State: {}", indent(1), state_label(report, dry_run)));
    }
    if !reports.is_empty() {
        lines.push(String::new());
    }
    lines.push(format_summary(&RunSummary::from_reports(reports), dry_run));
    lines
}

/// One-line totals.
pub fn format_summary(summary: &RunSummary, dry_run: bool) -> String {
    let verb = if dry_run { "Checked" } else { "Resolved" };
    let action = if dry_run { "to rewrite" } else { "rewritten" };
    format!(
        "{verb} {}: {} pre-published, {} {action}",
        pluralize(summary.documents, "document"),
        summary.pre_published,
        summary.written,
    )
}

/// Print the report to stdout.
pub fn print_reports(reports: &[DocumentReport], dry_run: bool) {
    for line in format_reports(reports, dry_run) {
        println!("{}", line);
    }
}
