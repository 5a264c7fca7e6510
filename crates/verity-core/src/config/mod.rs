//! Configuration system for verity.
//! TOML-based, layered resolution: CLI > env > --config > user > system > defaults.

pub mod dpkg_config;
pub mod policy_config;
pub mod remediation_config;
pub mod scan_config;
pub mod verity_config;

pub use dpkg_config::DpkgConfig;
pub use policy_config::PolicyConfig;
pub use remediation_config::RemediationConfig;
pub use scan_config::ScanConfig;
pub use verity_config::{CliOverrides, ConfigSources, VerityConfig};
