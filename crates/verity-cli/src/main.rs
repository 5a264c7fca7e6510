//! verity - check the integrity of installed package files

use std::process::ExitCode;

use clap::Parser;
use verity_cli::{app, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    app::run(&cli).into()
}
