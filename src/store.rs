//! Document storage.
//!
//! The resolver only needs two primitives: read a whole document as text and
//! overwrite a whole document with text. [`FsStore`] does both on the local
//! filesystem; [`DryRunStore`] reads from disk but keeps writes in memory,
//! which backs `prepublish check`.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

pub trait DocumentStore {
    fn read(&self, path: &Path) -> io::Result<String>;
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn read(&self, path: &Path) -> io::Result<String> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        (**self).write(path, contents)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl DocumentStore for FsStore {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// Reads through to the filesystem; records writes instead of performing them.
#[derive(Debug, Default)]
pub struct DryRunStore {
    writes: RefCell<Vec<(PathBuf, String)>>,
}

impl DryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes that would have happened, in order.
    pub fn pending_writes(&self) -> Vec<(PathBuf, String)> {
        self.writes.borrow().clone()
    }
}

impl DocumentStore for DryRunStore {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.writes
            .borrow_mut()
            .push((path.to_path_buf(), contents.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn fs_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("post.md");
        FsStore.write(&path, "---\na: 1\n---\n\nHi").unwrap();
        assert_eq!(FsStore.read(&path).unwrap(), "---\na: 1\n---\n\nHi");
    }

    #[test]
    fn fs_store_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = FsStore.read(&tmp.path().join("missing.md")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn dry_run_store_leaves_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("post.md");
        fs::write(&path, "original").unwrap();

        let store = DryRunStore::new();
        assert_eq!(store.read(&path).unwrap(), "original");
        store.write(&path, "changed").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
        assert_eq!(
            store.pending_writes(),
            vec![(path.clone(), "changed".to_string())]
        );
    }

    #[test]
    fn store_by_reference() {
        fn read_via(store: impl DocumentStore, path: &Path) -> String {
            store.read(path).unwrap()
        }
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("post.md");
        fs::write(&path, "text").unwrap();
        let store = DryRunStore::new();
        assert_eq!(read_via(&store, &path), "text");
    }
}
