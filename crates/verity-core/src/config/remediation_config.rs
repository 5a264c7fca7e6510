//! Reinstall behaviour.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RemediationConfig {
    /// Prefix package-manager commands with `sudo`. Default: true.
    pub use_sudo: Option<bool>,
    /// Run `apt-get update` before reinstalling. Default: true.
    pub refresh_index: Option<bool>,
    /// Pass `-y` to `apt-get install`. Default: false.
    pub assume_yes: Option<bool>,
}

impl RemediationConfig {
    pub fn effective_use_sudo(&self) -> bool {
        self.use_sudo.unwrap_or(true)
    }

    pub fn effective_refresh_index(&self) -> bool {
        self.refresh_index.unwrap_or(true)
    }

    pub fn effective_assume_yes(&self) -> bool {
        self.assume_yes.unwrap_or(false)
    }
}
