//! Shared test utilities for the prepublish test suite.
//!
//! Deterministic stand-ins for the resolver's capabilities, plus a store that
//! keeps documents in memory and counts writes:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let store = MemoryStore::with_document("post.md", "---\npublished: false\n---\n\nHi");
//! let resolver = test_resolver(&store, epoch_plus_days(1));
//! let decision = resolver.resolve(Path::new("post.md")).unwrap();
//! assert_eq!(store.write_count(), 1);
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::SlugConfig;
use crate::resolve::Resolver;
use crate::slug::{Clock, IdGenerator, SlugMinter};
use crate::store::DocumentStore;

// =========================================================================
// Capabilities
// =========================================================================

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Produces `aaa…`, `bbb…`, `ccc…` on successive calls.
#[derive(Debug, Default)]
pub struct SequentialIds {
    calls: Cell<u8>,
}

impl IdGenerator for SequentialIds {
    fn random_string(&self, len: usize) -> String {
        let n = self.calls.get();
        self.calls.set(n.wrapping_add(1));
        let c = char::from(b'a' + n % 26);
        std::iter::repeat_n(c, len).collect()
    }
}

/// `1970-01-01T00:00:00Z` shifted by whole days.
pub fn epoch_plus_days(days: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).unwrap() + Duration::days(days)
}

// =========================================================================
// In-memory store
// =========================================================================

/// Document store backed by a map; every write is also appended to a log.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<HashMap<PathBuf, String>>,
    writes: RefCell<Vec<(PathBuf, String)>>,
}

impl MemoryStore {
    pub fn with_document(path: &str, contents: &str) -> Self {
        let store = Self::default();
        store
            .files
            .borrow_mut()
            .insert(PathBuf::from(path), contents.to_string());
        store
    }

    pub fn contents(&self, path: &str) -> String {
        self.files
            .borrow()
            .get(Path::new(path))
            .cloned()
            .unwrap_or_else(|| panic!("document '{path}' not in store"))
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        self.writes
            .borrow_mut()
            .push((path.to_path_buf(), contents.to_string()));
        Ok(())
    }
}

// =========================================================================
// Resolver setup
// =========================================================================

/// Deterministic minter: default slug config, sequential ids, frozen clock.
pub fn test_minter(now: DateTime<Utc>) -> SlugMinter {
    SlugMinter::new(
        SlugConfig::default(),
        Box::new(SequentialIds::default()),
        Box::new(FixedClock::at(now)),
    )
}

/// Resolver over `store` with a deterministic minter.
pub fn test_resolver(store: &MemoryStore, now: DateTime<Utc>) -> Resolver<&MemoryStore> {
    Resolver::new(store, test_minter(now))
}
