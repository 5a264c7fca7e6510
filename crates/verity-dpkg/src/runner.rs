//! Subprocess seam. Everything that shells out goes through [`CommandRunner`].

use std::fmt;
use std::io;
use std::process::{Command, Stdio};

use verity_core::traits::ChildOutput;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Prefix with `sudo` when `elevate` is set.
    pub fn elevated(self, elevate: bool) -> Self {
        if !elevate {
            return self;
        }
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

pub trait CommandRunner: Send + Sync {
    /// Run to completion with stdout and stderr captured.
    fn capture(&self, command: &CommandSpec) -> io::Result<CommandOutput>;

    /// Run attached to the terminal; `Ok(true)` on a zero exit status.
    /// With [`ChildOutput::Stderr`] the child's stdout goes to our stderr.
    fn run_interactive(&self, command: &CommandSpec, output: ChildOutput) -> io::Result<bool>;
}

/// Runs commands on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn capture(&self, command: &CommandSpec) -> io::Result<CommandOutput> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run_interactive(&self, command: &CommandSpec, output: ChildOutput) -> io::Result<bool> {
        let mut child = Command::new(&command.program);
        child.args(&command.args);
        if output == ChildOutput::Stderr {
            child.stdout(Stdio::from(io::stderr()));
        }
        Ok(child.status()?.success())
    }
}
