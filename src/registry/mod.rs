//! File registry: which units each loaded file defined.
//!
//! ```text
//! FileRegistry
//! └── "app/models/post" → LoadedFile { path: "app/models/post.src",
//!                                      units: {Post, Post::Draft} }
//!
//! On file change:
//! 1. changed_files(is_changed) → affected files and their units
//! 2. Removal engine tears each unit down, then forget_unit prunes here
//! ```
//!
//! # Invariants
//! - No `LoadedFile` with an empty unit set survives any operation
//! - Every unit name appears in at most one file's set

mod path;
pub use path::normalize_load_path;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::unit::UnitName;

// =============================================================================
// LoadedFile
// =============================================================================

/// One source file's contribution to the live namespace.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// The path as first observed at load time (suffix intact).
    pub path: String,
    /// Names of the units this file defined.
    pub units: FxHashSet<UnitName>,
}

impl LoadedFile {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            units: FxHashSet::default(),
        }
    }
}

// =============================================================================
// FileRegistry
// =============================================================================

/// Mapping from normalized load path to [`LoadedFile`].
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: FxHashMap<String, LoadedFile>,
    /// Trailing source suffix stripped off registry keys (e.g. `.src`).
    source_suffix: String,
}

impl FileRegistry {
    /// Create an empty registry keyed with `source_suffix` stripped.
    pub fn new(source_suffix: impl Into<String>) -> Self {
        Self {
            files: FxHashMap::default(),
            source_suffix: source_suffix.into(),
        }
    }

    /// Associate newly defined units with the file loaded from `path`.
    ///
    /// Creates the entry on first load, unions on later loads of the same
    /// logical file. No-op for an empty unit set. A unit already tracked
    /// under a different file stays there (at-most-one-file invariant).
    pub fn record_load(&mut self, path: &str, new_units: &FxHashSet<UnitName>) {
        if new_units.is_empty() {
            return;
        }
        let key = normalize_load_path(path, &self.source_suffix);
        let elsewhere: FxHashSet<UnitName> = new_units
            .iter()
            .filter(|u| self.file_of(u).is_some_and(|k| k != key))
            .cloned()
            .collect();

        let file = self
            .files
            .entry(key.clone())
            .or_insert_with(|| LoadedFile::new(path));
        file.units
            .extend(new_units.iter().filter(|u| !elsewhere.contains(*u)).cloned());

        // Union with an all-duplicate set can still leave the entry empty.
        if file.units.is_empty() {
            self.files.remove(&key);
        }
    }

    /// Unit names defined by `path` (empty if untracked).
    pub fn units_defined_by(&self, path: &str) -> FxHashSet<UnitName> {
        let key = normalize_load_path(path, &self.source_suffix);
        self.files
            .get(&key)
            .map(|f| f.units.clone())
            .unwrap_or_default()
    }

    /// Remove `name` from every file's set, dropping files whose set
    /// empties. Returns the paths of evicted files so the caller can mark
    /// them not-yet-loaded with the host.
    pub fn forget_unit(&mut self, name: &UnitName) -> Vec<String> {
        let mut evicted = Vec::new();
        self.files.retain(|_, file| {
            file.units.remove(name);
            if file.units.is_empty() {
                evicted.push(file.path.clone());
                false
            } else {
                true
            }
        });
        evicted
    }

    /// Snapshot of tracked files whose path satisfies `is_changed`, with
    /// their units. Used by the batch-unload driver.
    pub fn changed_files(&self, is_changed: impl Fn(&str) -> bool) -> Vec<(String, Vec<UnitName>)> {
        self.files
            .values()
            .filter(|f| is_changed(&f.path))
            .map(|f| (f.path.clone(), f.units.iter().cloned().collect()))
            .collect()
    }

    /// Iterate all tracked files.
    pub fn files(&self) -> impl Iterator<Item = &LoadedFile> {
        self.files.values()
    }

    /// Number of tracked files.
    #[inline]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    // -------------------------------------------------------------------------
    // Private
    // -------------------------------------------------------------------------

    /// Registry key of the file currently tracking `name`, if any.
    fn file_of(&self, name: &UnitName) -> Option<&str> {
        self.files
            .iter()
            .find(|(_, f)| f.units.contains(name))
            .map(|(k, _)| k.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
