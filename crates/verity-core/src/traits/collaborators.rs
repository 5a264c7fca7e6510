//! Package-manager collaborator contracts.
//!
//! The engine never talks to a package manager directly. A provider supplies
//! the manifest and exemptions up front, a diversion check is consulted for
//! mismatching files, and the resolver/remediator pair runs only after the
//! report is final.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::errors::ProviderError;
use crate::types::{ExemptionSet, Manifest};

/// Source of the install-time manifest.
pub trait ManifestProvider {
    /// Load every tracked path with its recorded digest.
    fn load_manifest(&self) -> Result<Manifest, ProviderError>;

    /// Load the paths exempt from hashing (configuration files).
    fn load_exemptions(&self) -> Result<ExemptionSet, ProviderError>;
}

/// Answers whether a file is intentionally shadowed by another package.
pub trait DiversionCheck: Send + Sync {
    fn has_diversion(&self, path: &Path) -> bool;
}

/// Diversion check for systems without diversions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiversions;

impl DiversionCheck for NoDiversions {
    fn has_diversion(&self, _path: &Path) -> bool {
        false
    }
}

/// Reverse lookup from file paths to owning packages.
pub trait PackageResolver {
    fn packages_for(&self, paths: &[PathBuf]) -> BTreeSet<String>;
}

/// Where subprocesses started during remediation send their standard output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChildOutput {
    /// Share the terminal.
    #[default]
    Inherit,
    /// Write to our stderr, leaving stdout for the report.
    Stderr,
}

/// Reinstalls packages. Returns `false` on any failure and never panics.
pub trait Remediator {
    fn reinstall(&self, packages: &BTreeSet<String>, output: ChildOutput) -> bool;
}
