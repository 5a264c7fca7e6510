//! Manifest entries and the exemption set.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::collections::{FxHashMap, FxHashSet};

/// One tracked file and the digest recorded for it at install time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: PathBuf,
    /// Lowercase hex digest.
    pub expected_hash: String,
}

impl ManifestEntry {
    pub fn new(path: impl Into<PathBuf>, expected_hash: impl AsRef<str>) -> Self {
        Self {
            path: path.into(),
            expected_hash: expected_hash.as_ref().trim().to_ascii_lowercase(),
        }
    }
}

/// The full set of tracked files, ordered by path.
///
/// Paths are unique. The ordering makes partitioning deterministic no matter
/// which order the provider discovered entries in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a path → digest map.
    pub fn from_map(map: FxHashMap<PathBuf, String>) -> Self {
        let mut entries: Vec<ManifestEntry> = map
            .into_iter()
            .map(|(path, hash)| ManifestEntry::new(path, hash))
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Self { entries }
    }

    /// Build from entries in load order. A path seen twice keeps the later digest.
    pub fn from_entries(entries: impl IntoIterator<Item = ManifestEntry>) -> Self {
        let mut map: FxHashMap<PathBuf, String> = FxHashMap::default();
        for entry in entries {
            map.insert(entry.path, entry.expected_hash);
        }
        Self::from_map(map)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<ManifestEntry> {
        self.entries
    }

    /// Look up the expected digest for `path`.
    pub fn expected_hash(&self, path: &Path) -> Option<&str> {
        self.entries
            .binary_search_by(|e| e.path.as_path().cmp(path))
            .ok()
            .map(|i| self.entries[i].expected_hash.as_str())
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<ManifestEntry> for Manifest {
    fn from_iter<I: IntoIterator<Item = ManifestEntry>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

/// Configuration files that are expected to change after install.
/// Members are never hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExemptionSet {
    paths: FxHashSet<PathBuf>,
}

impl ExemptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for ExemptionSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}
