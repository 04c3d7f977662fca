//! Content discovery.
//!
//! Turns the paths given on the command line into the list of documents to
//! resolve. Files are taken as given; directories are walked recursively for
//! files whose extension is listed in `content.extensions`:
//!
//! ```text
//! content/
//! ├── prepublish.toml          # Config (not content)
//! ├── about.md                 # Document
//! ├── blog/
//! │   ├── 2024-hello.md        # Document
//! │   └── cover.jpg            # Ignored: not a content extension
//! └── .drafts/                 # Ignored: hidden
//!     └── idea.md
//! ```
//!
//! Hidden entries (name starting with `.`) are skipped, symlinks are not
//! followed, and results are sorted so runs are reproducible.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Path does not exist: {}", .0.display())]
    Missing(PathBuf),
}

/// Every content document under `root`, sorted.
pub fn collect_documents(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::Missing(root.to_path_buf()));
    }
    let mut documents = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && has_content_extension(entry.path(), extensions) {
            documents.push(entry.into_path());
        }
    }
    documents.sort();
    Ok(documents)
}

/// Expand command-line targets: directories are scanned, files kept as given.
///
/// With no targets the content root itself is scanned. Duplicates keep their
/// first position.
pub fn expand_targets(
    targets: &[PathBuf],
    root: &Path,
    extensions: &[String],
) -> Result<Vec<PathBuf>, ScanError> {
    if targets.is_empty() {
        return collect_documents(root, extensions);
    }
    let mut documents: Vec<PathBuf> = Vec::new();
    for target in targets {
        let found = if target.is_dir() {
            collect_documents(target, extensions)?
        } else if target.exists() {
            vec![target.clone()]
        } else {
            return Err(ScanError::Missing(target.clone()));
        };
        for path in found {
            if !documents.contains(&path) {
                documents.push(path);
            }
        }
    }
    Ok(documents)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn has_content_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}
