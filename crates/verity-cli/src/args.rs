//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use verity_core::config::CliOverrides;

use crate::app::{RepairMode, RunSettings};

#[derive(Debug, Parser)]
#[command(name = "verity")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file (on top of the system and user files)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of scan workers (default: derived from the CPU count)
    #[arg(short = 'j', long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// Give up on the scan after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Print the report as JSON instead of text; never prompts
    #[arg(long)]
    pub json: bool,

    /// Reinstall affected packages without asking
    #[arg(short, long, conflicts_with = "no_repair")]
    pub yes: bool,

    /// Report only; never reinstall
    #[arg(long)]
    pub no_repair: bool,

    /// Only print files that need attention
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Values that override every config file and the environment.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            scan_threads: self.threads.map(usize::from),
            scan_timeout_secs: self.timeout,
            assume_yes: self.yes.then_some(true),
        }
    }

    /// Default log filter; `VERITY_LOG` still takes precedence.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "verity=warn",
            1 => "verity=info",
            2 => "verity=debug",
            _ => "verity=trace",
        }
    }

    pub fn settings(&self) -> RunSettings {
        let repair = if self.no_repair {
            RepairMode::Never
        } else if self.yes {
            RepairMode::Always
        } else {
            RepairMode::Ask
        };
        RunSettings {
            json: self.json,
            quiet: self.quiet,
            repair,
        }
    }
}
