//! Package-manager collaborator errors.

use std::path::PathBuf;

use super::error_code::{self, VerityErrorCode};

/// Environment errors raised before scanning starts.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("No supported package manager found on PATH")]
    NoPackageManager,

    #[error("Package database not found at {path}")]
    DatabaseMissing { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl VerityErrorCode for ProviderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoPackageManager => error_code::NO_PACKAGE_MANAGER,
            Self::DatabaseMissing { .. } => error_code::DATABASE_MISSING,
            Self::Io { .. } => error_code::PROVIDER_ERROR,
        }
    }
}
