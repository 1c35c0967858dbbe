//! External command execution
//!
//! This module provides:
//! - A description of a command to run (`CommandSpec`)
//! - The `ProcessRunner` seam used by the fetcher and the dependency reporter
//! - `SystemProcessRunner`, which executes real commands and blocks until they exit

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// A command to execute: program, arguments and optional working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path
    pub program: OsString,
    /// Arguments passed to the program
    pub args: Vec<OsString>,
    /// Working directory (inherits the current one when unset)
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a command for the given program
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Render the command line for diagnostics
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

/// Exit status of a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl RunStatus {
    /// A successful exit (code 0)
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    /// An exit with the given code
    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Returns true if the command exited with code 0
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for RunStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Result of a command whose stdout was captured
#[derive(Debug, Clone)]
pub struct CapturedRun {
    /// Exit status
    pub status: RunStatus,
    /// Everything the command wrote to stdout
    pub stdout: Vec<u8>,
}

/// Trait for running external commands to completion
pub trait ProcessRunner {
    /// Run a command with stdout and stderr passed through to this process
    fn run_streaming(&self, command: &CommandSpec) -> std::io::Result<RunStatus>;

    /// Run a command capturing stdout; stderr is passed through
    fn run_captured(&self, command: &CommandSpec) -> std::io::Result<CapturedRun>;

    /// Resolve a program on the search path
    fn find_program(&self, name: &str) -> Result<PathBuf, which::Error>;
}

/// Default runner that executes real commands
#[derive(Debug, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    /// Create a new system process runner
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run_streaming(&self, command: &CommandSpec) -> std::io::Result<RunStatus> {
        tracing::debug!(command = %command.display(), "running");
        let status = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(status.into())
    }

    fn run_captured(&self, command: &CommandSpec) -> std::io::Result<CapturedRun> {
        tracing::debug!(command = %command.display(), "running (capturing stdout)");
        let output = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()?;
        Ok(CapturedRun {
            status: output.status.into(),
            stdout: output.stdout,
        })
    }

    fn find_program(&self, name: &str) -> Result<PathBuf, which::Error> {
        which::which(name)
    }
}
