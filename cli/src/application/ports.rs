//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::ProjectDescriptor;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
}

// ── Remote Host Ports ─────────────────────────────────────────────────────────

/// Paths discovered on the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePaths {
    pub home: String,
    pub shell: String,
}

/// Verbs issued to the remote service manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    /// `daemon-reload`; takes no unit name.
    Reload,
    Enable,
    Start,
    Stop,
    Restart,
}

impl ServiceAction {
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::Reload => "daemon-reload",
            Self::Enable => "enable",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }

    #[must_use]
    pub fn takes_unit(self) -> bool {
        self != Self::Reload
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Remote environment inspection.
#[allow(async_fn_in_trait)]
pub trait RemoteInspector {
    /// Resolve the remote home directory and shell path.
    async fn discover_paths(&self) -> Result<RemotePaths>;
}

/// Remote filesystem operations.
#[allow(async_fn_in_trait)]
pub trait RemoteFiles {
    /// `mkdir -p` semantics.
    async fn create_directory(&self, path: &str) -> Result<()>;
    /// Recursive remove. Callers sanitise `path` before calling.
    async fn remove_directory(&self, path: &str) -> Result<()>;
    /// Apply permission flags (e.g. `+x`) to a single remote path.
    async fn chmod(&self, mode: &str, path: &str) -> Result<()>;
    /// Recursive, permission-preserving copy from local to remote.
    async fn copy_tree(&self, local: &Path, remote: &str) -> Result<()>;
}

/// Remote service-manager operations, scoped by privilege mode.
#[allow(async_fn_in_trait)]
pub trait ServiceManager {
    /// Copy `<local_dir>/<unit>` into the manager's unit directory.
    async fn install_unit_file(&self, local_dir: &Path, unit: &str) -> Result<()>;
    /// Delete an installed unit file.
    async fn remove_unit_file(&self, unit: &str) -> Result<()>;
    /// Issue `action` against `unit` (ignored for `Reload`).
    async fn service_action(&self, action: ServiceAction, unit: &str) -> Result<()>;
    /// Raw status text, verbatim.
    async fn check_status(&self, unit: &str) -> Result<String>;
    /// Full unit listing, pre-filtering.
    async fn list_services(&self) -> Result<String>;
}

/// Composite trait: any type implementing all three sub-traits is a `RemoteHost`.
pub trait RemoteHost: RemoteInspector + RemoteFiles + ServiceManager {}

/// Blanket implementation: any type implementing all three sub-traits is a `RemoteHost`.
impl<T> RemoteHost for T where T: RemoteInspector + RemoteFiles + ServiceManager {}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Project Store Port ────────────────────────────────────────────────────────

/// Local persistence of project descriptors and generated unit files.
pub trait ProjectStore {
    /// Directory holding the project's files (it may not exist).
    fn project_dir(&self, name: &str) -> PathBuf;
    fn exists(&self, name: &str) -> bool;
    /// Create the project directory.
    ///
    /// # Errors
    ///
    /// Fails if the project already exists or the directory cannot be created.
    fn create(&self, name: &str) -> Result<PathBuf>;
    /// Delete the project directory and everything in it.
    fn remove(&self, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<ProjectDescriptor>;
    fn save(&self, descriptor: &ProjectDescriptor) -> Result<()>;
    /// Write a generated unit file into the project directory.
    fn write_unit(&self, name: &str, file_name: &str, contents: &str) -> Result<PathBuf>;
    /// Names of all stored projects, sorted.
    fn list(&self) -> Result<Vec<String>>;
}
