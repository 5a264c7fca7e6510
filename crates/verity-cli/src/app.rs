//! One `verity` run: load, scan, report, and optionally repair.

use std::collections::BTreeSet;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::{Duration, Instant};

use verity_core::config::{ConfigSources, VerityConfig};
use verity_core::constants::VERSION;
use verity_core::errors::{ScanError, VerityError, VerityErrorCode};
use verity_core::events::EventDispatcher;
use verity_core::tracing::init_tracing;
use serde::Serialize;
use verity_core::traits::{ChildOutput, ManifestProvider, PackageResolver, Remediator};
use verity_core::types::Manifest;
use verity_dpkg::{detect, AptRemediator, DiversionIndex, DpkgProvider, DpkgResolver};
use verity_scan::{AggregateReport, IgnorePolicy, ScanContext, ScanEngine};

use crate::args::Cli;
use crate::console::Console;
use crate::exit::ExitStatus;
use crate::interrupt::{self, InterruptToken};
use crate::scan_log::ScanLog;
use crate::{prompt, summary};

/// What to do when the scan finds something to fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairMode {
    Ask,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub json: bool,
    pub quiet: bool,
    pub repair: RepairMode,
}

/// What happened to the repair step, as reported with `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairResult {
    NotNeeded,
    /// No owning package was found for the affected files.
    Unresolved,
    NotRequested,
    Succeeded,
    Failed,
}

#[derive(Serialize)]
struct JsonOutput<'r> {
    #[serde(flatten)]
    report: &'r AggregateReport,
    packages: &'r BTreeSet<String>,
    repair: RepairResult,
}

/// Output and remediation for a run, independent of where the manifest came from.
pub struct Session<'a> {
    console: Console,
    settings: RunSettings,
    resolver: &'a dyn PackageResolver,
    remediator: &'a dyn Remediator,
    started: Instant,
}

impl<'a> Session<'a> {
    pub fn new(
        console: Console,
        settings: RunSettings,
        resolver: &'a dyn PackageResolver,
        remediator: &'a dyn Remediator,
    ) -> Self {
        Self {
            console,
            settings,
            resolver,
            remediator,
            started: Instant::now(),
        }
    }

    /// Count total time from `started` instead of from construction.
    pub fn started_at(mut self, started: Instant) -> Self {
        self.started = started;
        self
    }

    /// Run the scan, streaming status lines unless output is JSON.
    pub fn scan(&self, engine: ScanEngine, manifest: Manifest) -> Result<AggregateReport, ScanError> {
        let mut events = EventDispatcher::new();
        events.register(Arc::new(ScanLog));
        if !self.settings.json {
            events.register(Arc::new(self.console.clone()));
        }
        engine.with_events(Arc::new(events)).run(manifest)
    }

    /// Report the result and handle remediation. Time spent waiting at the
    /// prompt is left out of the total.
    pub fn finish(&self, report: AggregateReport, input: &mut impl BufRead) -> ExitStatus {
        if self.settings.json {
            return self.finish_json(report);
        }

        let mut waited = Duration::ZERO;
        let status = if report.is_clean() {
            self.console.line("No missing or corrupted files found!");
            ExitStatus::Success
        } else {
            let candidates = report.repair_candidates();
            for path in &candidates {
                self.console.line(path.display());
            }
            self.console.line("\nIt appears you have missing or corrupt files.");

            let packages = self.resolver.packages_for(&candidates);
            if packages.is_empty() {
                self.console.line("Could not determine which packages own these files.");
                ExitStatus::Success
            } else {
                let names: Vec<&str> = packages.iter().map(String::as_str).collect();
                self.console.line(format!(
                    "To fix them, you need to re-install these packages:\n{}",
                    names.join(" ")
                ));
                let approved = match self.settings.repair {
                    RepairMode::Never => false,
                    RepairMode::Always => true,
                    RepairMode::Ask => {
                        let asked = Instant::now();
                        let answer = prompt::confirm(&self.console, input, prompt::REINSTALL_QUESTION)
                            .unwrap_or_else(|e| {
                                tracing::warn!(error = %e, "could not read answer, not reinstalling");
                                false
                            });
                        waited = asked.elapsed();
                        answer
                    }
                };

                if !approved {
                    self.console.line("Not reinstalling. Exiting...");
                    ExitStatus::Success
                } else if self.remediator.reinstall(&packages, ChildOutput::Inherit) {
                    self.console.line("Reinstall complete.");
                    ExitStatus::Success
                } else {
                    self.console.line("Reinstall failed.");
                    ExitStatus::RepairFailed
                }
            }
        };

        let report = report.with_total_duration(self.started.elapsed().saturating_sub(waited));
        self.console.write(summary::render(&report));
        status
    }

    /// Stdout carries nothing but the report, so subprocess output is sent
    /// to stderr.
    fn finish_json(&self, report: AggregateReport) -> ExitStatus {
        let packages = if report.is_clean() {
            BTreeSet::new()
        } else {
            self.resolver.packages_for(&report.repair_candidates())
        };
        let repair = if report.is_clean() {
            RepairResult::NotNeeded
        } else if packages.is_empty() {
            RepairResult::Unresolved
        } else if self.settings.repair != RepairMode::Always {
            RepairResult::NotRequested
        } else if self.remediator.reinstall(&packages, ChildOutput::Stderr) {
            RepairResult::Succeeded
        } else {
            RepairResult::Failed
        };

        let report = report.with_total_duration(self.started.elapsed());
        let output = JsonOutput {
            report: &report,
            packages: &packages,
            repair,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => self.console.line(json),
            Err(e) => tracing::error!(error = %e, "could not serialize report"),
        }
        if repair == RepairResult::Failed {
            ExitStatus::RepairFailed
        } else {
            ExitStatus::Success
        }
    }
}

/// Entry point for the binary.
pub fn run(cli: &Cli) -> ExitStatus {
    init_tracing(cli.log_directive());
    tracing::debug!(version = VERSION, "verity starting");

    match run_dpkg(cli) {
        Ok(status) => status,
        Err(err) => {
            let status = ExitStatus::from(&err);
            tracing::error!(code = err.error_code(), error = %err, "run failed");
            if status == ExitStatus::Interrupted {
                eprintln!("\nInterrupted, no report produced.");
            } else {
                eprintln!("verity: {}", err.coded_string());
            }
            status
        }
    }
}

fn run_dpkg(cli: &Cli) -> Result<ExitStatus, VerityError> {
    let started = Instant::now();
    let settings = cli.settings();
    let config = VerityConfig::load(&ConfigSources::standard(cli.config.clone()), Some(&cli.overrides()))?;
    tracing::debug!(?config, "configuration resolved");

    let path_var = std::env::var_os("PATH").unwrap_or_default();
    detect(&path_var, &config.dpkg.effective_info_dir())?;

    let console = Console::stdout(settings.quiet);
    let progress = |text: &str| {
        if !settings.json {
            console.write(text);
        }
    };

    progress("Loading");
    let provider = DpkgProvider::from_config(&config.dpkg);
    let database = provider.load_database()?;
    progress(".");
    let exemptions = provider.load_exemptions()?;
    progress(".");
    let diversions = DiversionIndex::from_config(&config.dpkg)?;
    progress("Done!\n");

    let context = ScanContext::new(exemptions)
        .with_policy(IgnorePolicy::from_config(&config.policy))
        .with_diversions(Arc::new(diversions));
    let engine = ScanEngine::from_config(context, &config.scan).with_cancellation(Arc::new(InterruptToken::new()));
    tracing::debug!(workers = engine.workers(), "engine configured");

    let resolver = DpkgResolver::new(database.owners);
    let remediator = AptRemediator::new(&config.remediation);
    let session = Session::new(console.clone(), settings, &resolver, &remediator).started_at(started);

    interrupt::install();
    let scanned = session.scan(engine, database.manifest);
    interrupt::restore_default();

    let report = scanned?;
    Ok(session.finish(report, &mut io::stdin().lock()))
}
