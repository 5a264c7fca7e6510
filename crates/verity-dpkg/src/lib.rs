//! dpkg/apt implementation of the verity collaborator traits.
//!
//! Reads the per-package `*.md5sums` and `*.conffiles` metadata under the dpkg
//! info directory, answers diversion queries from the diversion database, maps
//! paths back to packages, and reinstalls packages through `apt-get`.

pub mod database;
pub mod detect;
pub mod diversions;
pub mod parse;
pub mod remediation;
pub mod resolver;
pub mod runner;

pub use database::{DpkgDatabase, DpkgProvider};
pub use detect::{detect, find_executable};
pub use diversions::DiversionIndex;
pub use remediation::AptRemediator;
pub use resolver::DpkgResolver;
pub use runner::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
