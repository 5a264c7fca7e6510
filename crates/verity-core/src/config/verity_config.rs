//! Top-level verity configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DpkgConfig, PolicyConfig, RemediationConfig, ScanConfig};
use crate::constants::SYSTEM_CONFIG_PATH;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`VERITY_*`)
/// 3. Explicit config file (`--config`)
/// 4. User config (`~/.verity/config.toml`)
/// 5. System config (`/etc/verity/verity.toml`)
/// 6. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct VerityConfig {
    pub scan: ScanConfig,
    pub policy: PolicyConfig,
    pub dpkg: DpkgConfig,
    pub remediation: RemediationConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub scan_threads: Option<usize>,
    pub scan_timeout_secs: Option<u64>,
    pub assume_yes: Option<bool>,
}

/// Where config files are looked up.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Optional; parse errors are fatal, unreadable files are ignored.
    pub system: Option<PathBuf>,
    /// Optional; same rules as `system`.
    pub user: Option<PathBuf>,
    /// Must exist when given.
    pub explicit: Option<PathBuf>,
}

impl ConfigSources {
    /// The standard system and user locations plus an optional `--config` path.
    pub fn standard(explicit: Option<PathBuf>) -> Self {
        Self {
            system: Some(PathBuf::from(SYSTEM_CONFIG_PATH)),
            user: user_config_path(),
            explicit,
        }
    }
}

impl VerityConfig {
    /// Load configuration with layered resolution.
    pub fn load(
        sources: &ConfigSources,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority first: system, then user.
        for optional in [&sources.system, &sources.user].into_iter().flatten() {
            if optional.exists() {
                match Self::merge_toml_file(&mut config, optional) {
                    Ok(()) => {}
                    Err(err @ ConfigError::ParseError { .. }) => return Err(err),
                    Err(err) => {
                        tracing::warn!(path = %optional.display(), error = %err, "skipping unreadable config file");
                    }
                }
            }
        }

        if let Some(explicit) = &sources.explicit {
            if !explicit.exists() {
                return Err(ConfigError::FileNotFound {
                    path: explicit.display().to_string(),
                });
            }
            Self::merge_toml_file(&mut config, explicit)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &VerityConfig) -> Result<(), ConfigError> {
        if config.scan.threads == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.threads".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.scan.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for (field, values) in [
            ("policy.man_prefixes", &config.policy.man_prefixes),
            ("policy.locale_markers", &config.policy.locale_markers),
            ("policy.help_markers", &config.policy.help_markers),
        ] {
            if values.iter().any(|v| v.trim().is_empty()) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "entries must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut VerityConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: VerityConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only values set in `other` win.
    fn merge(base: &mut VerityConfig, other: &VerityConfig) {
        // Scan
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }
        if other.scan.timeout_secs.is_some() {
            base.scan.timeout_secs = other.scan.timeout_secs;
        }

        // Policy
        if !other.policy.man_prefixes.is_empty() {
            base.policy.man_prefixes = other.policy.man_prefixes.clone();
        }
        if !other.policy.locale_markers.is_empty() {
            base.policy.locale_markers = other.policy.locale_markers.clone();
        }
        if !other.policy.help_markers.is_empty() {
            base.policy.help_markers = other.policy.help_markers.clone();
        }

        // dpkg
        if other.dpkg.info_dir.is_some() {
            base.dpkg.info_dir = other.dpkg.info_dir.clone();
        }
        if other.dpkg.diversions_file.is_some() {
            base.dpkg.diversions_file = other.dpkg.diversions_file.clone();
        }
        if other.dpkg.sibling_heuristic.is_some() {
            base.dpkg.sibling_heuristic = other.dpkg.sibling_heuristic;
        }

        // Remediation
        if other.remediation.use_sudo.is_some() {
            base.remediation.use_sudo = other.remediation.use_sudo;
        }
        if other.remediation.refresh_index.is_some() {
            base.remediation.refresh_index = other.remediation.refresh_index;
        }
        if other.remediation.assume_yes.is_some() {
            base.remediation.assume_yes = other.remediation.assume_yes;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `VERITY_SCAN_THREADS`, `VERITY_DPKG_INFO_DIR`, etc.
    fn apply_env_overrides(config: &mut VerityConfig) {
        if let Ok(val) = std::env::var("VERITY_SCAN_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.scan.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VERITY_SCAN_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.scan.timeout_secs = Some(v);
            }
        }
        if let Some(val) = std::env::var_os("VERITY_DPKG_INFO_DIR") {
            config.dpkg.info_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("VERITY_REMEDIATION_USE_SUDO") {
            if let Ok(v) = val.parse::<bool>() {
                config.remediation.use_sudo = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut VerityConfig, cli: &CliOverrides) {
        if let Some(v) = cli.scan_threads {
            config.scan.threads = Some(v);
        }
        if let Some(v) = cli.scan_timeout_secs {
            config.scan.timeout_secs = Some(v);
        }
        if let Some(v) = cli.assume_yes {
            config.remediation.assume_yes = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// `~/.verity/config.toml`
fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".verity").join("config.toml"))
}
