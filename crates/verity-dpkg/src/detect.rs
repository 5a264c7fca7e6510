//! Package manager detection.

use std::ffi::OsStr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use verity_core::errors::ProviderError;

/// Front-ends that count as "apt is installed".
const APT_FRONTENDS: &[&str] = &["apt", "apt-get"];

/// First executable named `name` in the directories of `path_var`.
pub fn find_executable(path_var: &OsStr, name: &str) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Check that apt is reachable through `path_var` and that the dpkg info
/// directory exists.
pub fn detect(path_var: &OsStr, info_dir: &Path) -> Result<PathBuf, ProviderError> {
    let Some(apt) = APT_FRONTENDS
        .iter()
        .find_map(|name| find_executable(path_var, name))
    else {
        return Err(ProviderError::NoPackageManager);
    };
    if !info_dir.is_dir() {
        return Err(ProviderError::DatabaseMissing {
            path: info_dir.to_path_buf(),
        });
    }
    tracing::debug!(apt = %apt.display(), info_dir = %info_dir.display(), "dpkg detected");
    Ok(apt)
}
