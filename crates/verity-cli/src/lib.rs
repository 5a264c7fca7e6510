//! The `verity` command: scan installed package files against the dpkg
//! manifest and offer to reinstall whatever is missing or corrupted.

pub mod app;
pub mod args;
pub mod console;
pub mod exit;
pub mod interrupt;
pub mod prompt;
pub mod scan_log;
pub mod summary;

pub use app::{RepairMode, RepairResult, RunSettings, Session};
pub use args::Cli;
pub use console::Console;
pub use exit::ExitStatus;
