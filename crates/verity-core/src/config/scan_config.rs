//! Scan engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TIMEOUT_SECS;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    /// Fixed number of workers. Unset: derived from available parallelism.
    pub threads: Option<usize>,
    /// Deadline for the whole scan, in seconds. Default: 3600.
    pub timeout_secs: Option<u64>,
}

impl ScanConfig {
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
