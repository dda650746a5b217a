//! Application context: unified state passed to every command handler.
//!
//! `AppContext` bundles the output context, the local project store, and the
//! remote command settings so command handlers take a single `&AppContext`.

use std::time::Duration;

use anyhow::Result;

use crate::domain::{PrivilegeMode, ProjectDescriptor};
use crate::infra::command_runner::{MIN_COPY_TIMEOUT, TokioCommandRunner};
use crate::infra::ssh::{SshHost, SshTarget};
use crate::infra::store::FsProjectStore;
use crate::output::{HumanRenderer, OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `ASYD_YES` env vars).
    pub yes: bool,
    /// Timeout for each remote shell command.
    pub timeout: Duration,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode). Quiet in JSON mode.
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Local project store.
    pub store: FsProjectStore,
    /// Timeout for remote shell commands.
    pub timeout: Duration,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `ASYD_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the store root cannot be resolved (home directory not found).
    pub fn new(flags: &AppFlags) -> Result<Self> {
        Ok(Self::with_store(flags, FsProjectStore::new()?))
    }

    /// Construct with an explicit store (used in tests).
    #[must_use]
    pub fn with_store(flags: &AppFlags, store: FsProjectStore) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("ASYD_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet || flags.output.json,
            ),
            mode,
            store,
            timeout: flags.behaviour.timeout,
            non_interactive,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Timeout for `scp` copies: the shell timeout, but never below ten minutes.
    #[must_use]
    pub fn copy_timeout(&self) -> Duration {
        self.timeout.max(MIN_COPY_TIMEOUT)
    }

    /// Remote host for an existing project.
    #[must_use]
    pub fn remote_for(&self, descriptor: &ProjectDescriptor) -> SshHost<TokioCommandRunner> {
        SshHost::for_project(TokioCommandRunner::new(self.timeout), descriptor)
            .with_copy_timeout(self.copy_timeout())
    }

    /// Remote host for an ad-hoc target (e.g. `asyd list`).
    #[must_use]
    pub fn remote_at(&self, target: SshTarget, mode: PrivilegeMode) -> SshHost<TokioCommandRunner> {
        SshHost::new(TokioCommandRunner::new(self.timeout), target, mode)
            .with_copy_timeout(self.copy_timeout())
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `ASYD_YES` env),
    /// returns `true` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(true);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
