//! Diversion lookups.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use verity_core::config::DpkgConfig;
use verity_core::errors::ProviderError;
use verity_core::traits::DiversionCheck;

use crate::parse::parse_diversions;

/// Diverted paths from the dpkg database, plus an optional fallback that looks
/// for a renamed original next to the file.
#[derive(Debug, Clone, Default)]
pub struct DiversionIndex {
    diverted: FxHashSet<PathBuf>,
    sibling_heuristic: bool,
}

impl DiversionIndex {
    pub fn new(diverted: impl IntoIterator<Item = PathBuf>, sibling_heuristic: bool) -> Self {
        Self {
            diverted: diverted.into_iter().collect(),
            sibling_heuristic,
        }
    }

    /// Read the diversion database. A missing database means no diversions.
    pub fn load(path: &Path, sibling_heuristic: bool) -> Result<Self, ProviderError> {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no diversion database");
                Vec::new()
            }
            Err(source) => {
                return Err(ProviderError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let index = Self::new(parse_diversions(&content), sibling_heuristic);
        tracing::debug!(diversions = index.len(), "loaded diversions");
        Ok(index)
    }

    pub fn from_config(config: &DpkgConfig) -> Result<Self, ProviderError> {
        Self::load(&config.effective_diversions_file(), config.effective_sibling_heuristic())
    }

    pub fn len(&self) -> usize {
        self.diverted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diverted.is_empty()
    }
}

impl DiversionCheck for DiversionIndex {
    fn has_diversion(&self, path: &Path) -> bool {
        self.diverted.contains(path) || (self.sibling_heuristic && has_orig_sibling(path))
    }
}

/// Whether the directory of `path` holds another entry whose name contains the
/// file's stem, `orig`, and its extension (`foo.conf` -> `foo.conf.orig`).
fn has_orig_sibling(path: &Path) -> bool {
    let (Some(dir), Some(name)) = (path.parent(), path.file_name().and_then(|n| n.to_str())) else {
        return false;
    };
    let stem = name.split('.').next().unwrap_or(name);
    let extension = name.rsplit('.').next().unwrap_or(name);

    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries
        .filter_map(Result::ok)
        .filter_map(|e| e.file_name().into_string().ok())
        .any(|sibling| {
            sibling != name && sibling.contains(stem) && sibling.contains("orig") && sibling.contains(extension)
        })
}
