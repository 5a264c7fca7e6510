//! Path to package lookup.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use verity_core::traits::PackageResolver;

use crate::parse::parse_dpkg_search;
use crate::runner::{CommandRunner, CommandSpec, SystemRunner};

/// Resolves owners from the md5sums index, asking `dpkg -S` for anything the
/// index does not know.
pub struct DpkgResolver {
    owners: FxHashMap<PathBuf, String>,
    runner: Arc<dyn CommandRunner>,
}

impl DpkgResolver {
    pub fn new(owners: FxHashMap<PathBuf, String>) -> Self {
        Self::with_runner(owners, Arc::new(SystemRunner))
    }

    pub fn with_runner(owners: FxHashMap<PathBuf, String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { owners, runner }
    }

    fn query_dpkg(&self, path: &Path) -> Vec<String> {
        let command = CommandSpec::new("dpkg", ["-S".to_string(), path.display().to_string()]);
        match self.runner.capture(&command) {
            Ok(output) if output.success => parse_dpkg_search(&output.stdout),
            Ok(output) => {
                tracing::warn!(path = %path.display(), stderr = %output.stderr.trim(), "dpkg -S found no owner");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "dpkg -S could not run");
                Vec::new()
            }
        }
    }
}

impl PackageResolver for DpkgResolver {
    fn packages_for(&self, paths: &[PathBuf]) -> BTreeSet<String> {
        let mut packages = BTreeSet::new();
        for path in paths {
            match self.owners.get(path) {
                Some(owner) => {
                    packages.insert(owner.clone());
                }
                None => packages.extend(self.query_dpkg(path)),
            }
        }
        tracing::debug!(paths = paths.len(), packages = packages.len(), "resolved owning packages");
        packages
    }
}

impl std::fmt::Debug for DpkgResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DpkgResolver")
            .field("owners", &self.owners.len())
            .finish_non_exhaustive()
    }
}
