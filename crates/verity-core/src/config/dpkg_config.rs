//! dpkg collaborator configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DPKG_DIVERSIONS_FILE, DEFAULT_DPKG_INFO_DIR};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DpkgConfig {
    /// Directory holding `*.md5sums` and `*.conffiles`. Default: /var/lib/dpkg/info.
    pub info_dir: Option<PathBuf>,
    /// dpkg diversion database. Default: /var/lib/dpkg/diversions.
    pub diversions_file: Option<PathBuf>,
    /// Also treat a sibling `*orig*` file as a diversion. Default: true.
    pub sibling_heuristic: Option<bool>,
}

impl DpkgConfig {
    pub fn effective_info_dir(&self) -> PathBuf {
        self.info_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DPKG_INFO_DIR))
    }

    pub fn effective_diversions_file(&self) -> PathBuf {
        self.diversions_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DPKG_DIVERSIONS_FILE))
    }

    pub fn effective_sibling_heuristic(&self) -> bool {
        self.sibling_heuristic.unwrap_or(true)
    }
}
