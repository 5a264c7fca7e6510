//! Reinstalling packages through apt-get.

use std::collections::BTreeSet;
use std::sync::Arc;

use verity_core::config::RemediationConfig;
use verity_core::traits::{ChildOutput, Remediator};

use crate::runner::{CommandRunner, CommandSpec, SystemRunner};

pub struct AptRemediator {
    runner: Arc<dyn CommandRunner>,
    use_sudo: bool,
    refresh_index: bool,
    assume_yes: bool,
}

impl AptRemediator {
    pub fn new(config: &RemediationConfig) -> Self {
        Self::with_runner(config, Arc::new(SystemRunner))
    }

    pub fn with_runner(config: &RemediationConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            use_sudo: config.effective_use_sudo(),
            refresh_index: config.effective_refresh_index(),
            assume_yes: config.effective_assume_yes(),
        }
    }

    /// Commands that reinstalling `packages` would run, in order.
    pub fn plan(&self, packages: &BTreeSet<String>) -> Vec<CommandSpec> {
        if packages.is_empty() {
            return Vec::new();
        }
        let mut commands = Vec::with_capacity(2);
        if self.refresh_index {
            commands.push(CommandSpec::new("apt-get", ["update"]).elevated(self.use_sudo));
        }
        let mut args = vec!["install".to_string(), "--reinstall".to_string()];
        if self.assume_yes {
            args.push("-y".to_string());
        }
        args.extend(packages.iter().cloned());
        commands.push(CommandSpec::new("apt-get", args).elevated(self.use_sudo));
        commands
    }
}

impl Remediator for AptRemediator {
    fn reinstall(&self, packages: &BTreeSet<String>, output: ChildOutput) -> bool {
        for command in self.plan(packages) {
            tracing::info!(command = %command, ?output, "running");
            match self.runner.run_interactive(&command, output) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::error!(command = %command, "command exited with failure");
                    return false;
                }
                Err(e) => {
                    tracing::error!(command = %command, error = %e, "command could not be started");
                    return false;
                }
            }
        }
        true
    }
}

impl std::fmt::Debug for AptRemediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AptRemediator")
            .field("use_sudo", &self.use_sudo)
            .field("refresh_index", &self.refresh_index)
            .field("assume_yes", &self.assume_yes)
            .finish_non_exhaustive()
    }
}
