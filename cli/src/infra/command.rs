//! Structured command construction and execution.
//!
//! `CommandLine` collects a program and an argument vector; arguments are
//! passed to the child process as-is, never re-parsed by a local shell. The
//! only quoting happens in [`remote_command`], which builds the single string
//! handed to `ssh` for the remote shell.

use std::borrow::Cow;
use std::process::ExitStatus;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::CommandRunner;
use crate::domain::RemoteError;

/// A program plus its arguments, consumed on execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Run with the runner's default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or times out. A
    /// non-zero exit is not an error here; see [`CommandOutput::check`].
    pub async fn execute<R: CommandRunner>(self, runner: &R) -> Result<CommandOutput> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let output = runner.run(&self.program, &args).await?;
        Ok(CommandOutput::from_output(self.program, output))
    }

    /// Run with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or times out.
    pub async fn execute_with_timeout<R: CommandRunner>(
        self,
        runner: &R,
        timeout: Duration,
    ) -> Result<CommandOutput> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let output = runner.run_with_timeout(&self.program, &args, timeout).await?;
        Ok(CommandOutput::from_output(self.program, output))
    }
}

/// Captured result of one executed command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub program: String,
    /// Standard output with one trailing newline removed.
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
}

impl CommandOutput {
    fn from_output(program: String, output: std::process::Output) -> Self {
        let mut stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.ends_with('\n') {
            stdout.pop();
            if stdout.ends_with('\r') {
                stdout.pop();
            }
        }
        Self {
            program,
            stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status,
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }

    #[must_use]
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Turn a non-zero exit into `RemoteError::CommandFailed` for `operation`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::CommandFailed` carrying the exit code and stderr.
    pub fn check(self, operation: &str) -> Result<Self, RemoteError> {
        if self.success() {
            Ok(self)
        } else {
            Err(self.into_error(operation))
        }
    }

    #[must_use]
    pub fn into_error(self, operation: &str) -> RemoteError {
        RemoteError::CommandFailed {
            operation: operation.to_string(),
            program: self.program,
            code: self.status.code(),
            stderr: self.stderr,
        }
    }
}

/// Quote one argument for the remote shell.
///
/// A leading `~/` stays unquoted so the remote shell still expands it.
#[must_use]
pub fn escape_remote_arg(arg: &str) -> Cow<'_, str> {
    if arg == "~" {
        return Cow::Borrowed(arg);
    }
    match arg.strip_prefix("~/") {
        Some("") => Cow::Borrowed(arg),
        Some(rest) => Cow::Owned(format!("~/{}", shell_escape::escape(Cow::Borrowed(rest)))),
        None => shell_escape::escape(Cow::Borrowed(arg)),
    }
}

/// Join arguments into the single command string sent over ssh.
#[must_use]
pub fn remote_command(args: &[&str]) -> String {
    args.iter()
        .map(|a| escape_remote_arg(a))
        .collect::<Vec<_>>()
        .join(" ")
}
