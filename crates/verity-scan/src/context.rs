//! Read-only state shared by every worker of a scan.

use std::sync::Arc;

use verity_core::traits::{DiversionCheck, NoDiversions};
use verity_core::types::ExemptionSet;

use crate::policy::IgnorePolicy;

/// Loaded once before the scan and shared across workers through an `Arc`.
/// Nothing in here is mutated while workers run.
#[derive(Clone)]
pub struct ScanContext {
    pub exemptions: ExemptionSet,
    pub policy: IgnorePolicy,
    pub diversions: Arc<dyn DiversionCheck>,
}

impl ScanContext {
    pub fn new(exemptions: ExemptionSet) -> Self {
        Self {
            exemptions,
            policy: IgnorePolicy::default(),
            diversions: Arc::new(NoDiversions),
        }
    }

    pub fn with_policy(mut self, policy: IgnorePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_diversions(mut self, diversions: Arc<dyn DiversionCheck>) -> Self {
        self.diversions = diversions;
        self
    }
}

impl std::fmt::Debug for ScanContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanContext")
            .field("exemptions", &self.exemptions.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
