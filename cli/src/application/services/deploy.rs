//! Application service: deployment pipeline.
//!
//! Runs the ordered deployment steps against a `RemoteHost` and a
//! `ProjectStore`, stopping at the first failure. Local artifacts of a fresh
//! project are rolled back on failure; remote partial state is left in place
//! for `remove` to clean up.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::fmt;
use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::application::ports::{ProgressReporter, ProjectStore, RemoteHost, ServiceAction};
use crate::domain::ProjectDescriptor;
use crate::domain::unit_file;

/// Permission flags applied to the remote entry point.
const ENTRY_POINT_MODE: &str = "+x";

// ── Steps and states ──────────────────────────────────────────────────────────

/// One step of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStep {
    DiscoverPaths,
    PersistDescriptor,
    GenerateUnits,
    CreateRemoteDir,
    CopyProject,
    MarkExecutable,
    InstallUnits,
    ReloadManager,
    EnableUnit,
    StartUnit,
    FinalPersist,
}

impl DeployStep {
    pub const ALL: [Self; 11] = [
        Self::DiscoverPaths,
        Self::PersistDescriptor,
        Self::GenerateUnits,
        Self::CreateRemoteDir,
        Self::CopyProject,
        Self::MarkExecutable,
        Self::InstallUnits,
        Self::ReloadManager,
        Self::EnableUnit,
        Self::StartUnit,
        Self::FinalPersist,
    ];

    /// 1-based position in the pipeline.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::DiscoverPaths => 1,
            Self::PersistDescriptor => 2,
            Self::GenerateUnits => 3,
            Self::CreateRemoteDir => 4,
            Self::CopyProject => 5,
            Self::MarkExecutable => 6,
            Self::InstallUnits => 7,
            Self::ReloadManager => 8,
            Self::EnableUnit => 9,
            Self::StartUnit => 10,
            Self::FinalPersist => 11,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DiscoverPaths => "discover remote paths",
            Self::PersistDescriptor => "save project config",
            Self::GenerateUnits => "generate unit files",
            Self::CreateRemoteDir => "create remote directory",
            Self::CopyProject => "copy project files",
            Self::MarkExecutable => "mark entry point executable",
            Self::InstallUnits => "install unit files",
            Self::ReloadManager => "reload service manager",
            Self::EnableUnit => "enable unit",
            Self::StartUnit => "start unit",
            Self::FinalPersist => "record deployment",
        }
    }

    /// State the pipeline is in once this step has succeeded.
    #[must_use]
    pub fn state_after(self) -> DeployState {
        match self {
            Self::DiscoverPaths
            | Self::PersistDescriptor
            | Self::GenerateUnits
            | Self::CreateRemoteDir
            | Self::CopyProject => DeployState::PathsDiscovered,
            Self::MarkExecutable => DeployState::Staged,
            Self::InstallUnits | Self::ReloadManager => DeployState::UnitInstalled,
            Self::EnableUnit => DeployState::Enabled,
            Self::StartUnit => DeployState::Running,
            Self::FinalPersist => DeployState::Complete,
        }
    }
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}/{} ({})", self.index(), Self::ALL.len(), self.name())
    }
}

/// Pipeline state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployState {
    Init,
    PathsDiscovered,
    Staged,
    UnitInstalled,
    Enabled,
    Running,
    Complete,
    Failed,
}

// ── Options, report, error ────────────────────────────────────────────────────

/// Verb used for the final activation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Start,
    /// Redeploys restart so a running service picks up the new files.
    Restart,
}

impl Activation {
    fn action(self) -> ServiceAction {
        match self {
            Self::Start => ServiceAction::Start,
            Self::Restart => ServiceAction::Restart,
        }
    }
}

/// What to do with the local project directory when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollback {
    /// The directory was created by this run; delete it.
    RemoveLocalProject,
    /// The project existed before this run; leave it.
    KeepLocalProject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOptions {
    pub activation: Activation,
    pub rollback: Rollback,
    /// Remove the remote project directory before copying.
    pub clear_remote: bool,
}

impl DeployOptions {
    /// First deployment of a freshly created project.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            activation: Activation::Start,
            rollback: Rollback::RemoveLocalProject,
            clear_remote: false,
        }
    }

    /// Deployment of an existing project.
    #[must_use]
    pub fn redeploy() -> Self {
        Self {
            activation: Activation::Restart,
            rollback: Rollback::KeepLocalProject,
            clear_remote: true,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    pub state: DeployState,
    pub completed: Vec<DeployStep>,
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("deployment failed at {step}")]
    StepFailed {
        step: DeployStep,
        /// Last state reached before the failing step.
        reached: DeployState,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl DeployError {
    #[must_use]
    pub fn step(&self) -> DeployStep {
        match self {
            Self::StepFailed { step, .. } => *step,
        }
    }

    #[must_use]
    pub fn reached(&self) -> DeployState {
        match self {
            Self::StepFailed { reached, .. } => *reached,
        }
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run every step in order against `descriptor`.
///
/// `descriptor` is updated in place with discovered paths and the deployment
/// timestamp.
///
/// # Errors
///
/// Returns `DeployError::StepFailed` naming the first failing step.
pub async fn deploy(
    remote: &impl RemoteHost,
    store: &impl ProjectStore,
    reporter: &impl ProgressReporter,
    descriptor: &mut ProjectDescriptor,
    opts: DeployOptions,
) -> Result<DeployReport, DeployError> {
    let mut report = DeployReport {
        state: DeployState::Init,
        completed: Vec::with_capacity(DeployStep::ALL.len()),
    };

    for step in DeployStep::ALL {
        tracing::info!(project = %descriptor.name, step = step.index(), "{}", step.name());
        reporter.step(&format!("{}...", capitalize(step.name())));

        if let Err(source) = run_step(step, remote, store, descriptor, opts).await {
            let reached = report.state;
            report.state = DeployState::Failed;
            tracing::debug!(project = %descriptor.name, ?reached, "pipeline failed: {source:#}");
            if step == DeployStep::CopyProject && opts.clear_remote {
                warn_remote_cleared(reporter, descriptor);
            }
            if opts.rollback == Rollback::RemoveLocalProject {
                rollback_local(store, reporter, &descriptor.name);
            }
            return Err(DeployError::StepFailed {
                step,
                reached,
                source: source.into(),
            });
        }

        report.completed.push(step);
        report.state = step.state_after();
    }

    reporter.success(&format!(
        "{} deployed as {}",
        descriptor.name,
        descriptor.primary_unit()
    ));
    Ok(report)
}

async fn run_step(
    step: DeployStep,
    remote: &impl RemoteHost,
    store: &impl ProjectStore,
    d: &mut ProjectDescriptor,
    opts: DeployOptions,
) -> Result<()> {
    match step {
        DeployStep::DiscoverPaths => {
            let paths = remote.discover_paths().await?;
            d.remote_home = Some(paths.home);
            d.remote_shell = Some(paths.shell);
        }
        DeployStep::PersistDescriptor => store.save(d)?,
        DeployStep::GenerateUnits => {
            for unit in unit_file::generate(d)? {
                store.write_unit(&d.name, &unit.file_name, &unit.contents)?;
            }
        }
        DeployStep::CreateRemoteDir => remote.create_directory(&d.remote_base_dir()).await?,
        DeployStep::CopyProject => {
            let target = d.remote_project_dir();
            if opts.clear_remote {
                remote.remove_directory(&target).await?;
            }
            remote
                .copy_tree(Path::new(&d.working_directory), &target)
                .await?;
        }
        DeployStep::MarkExecutable => {
            remote
                .chmod(ENTRY_POINT_MODE, &d.remote_entry_point())
                .await?;
        }
        DeployStep::InstallUnits => {
            let dir = store.project_dir(&d.name);
            for unit in d.units() {
                remote.install_unit_file(&dir, &unit).await?;
            }
        }
        DeployStep::ReloadManager => remote.service_action(ServiceAction::Reload, "").await?,
        DeployStep::EnableUnit => {
            remote
                .service_action(ServiceAction::Enable, &d.primary_unit())
                .await?;
        }
        DeployStep::StartUnit => {
            remote
                .service_action(opts.activation.action(), &d.primary_unit())
                .await?;
        }
        DeployStep::FinalPersist => {
            d.deployed_at = Some(Utc::now());
            store.save(d)?;
        }
    }
    Ok(())
}

fn rollback_local(store: &impl ProjectStore, reporter: &impl ProgressReporter, name: &str) {
    tracing::warn!(project = %name, "rolling back local project directory");
    match store.remove(name) {
        Ok(()) => reporter.warn(&format!("Removed local project '{name}'")),
        Err(e) => {
            tracing::warn!(project = %name, "rollback failed: {e:#}");
            reporter.warn(&format!("Could not remove local project '{name}': {e}"));
        }
    }
}

/// The old remote files are already gone when a redeploy copy fails.
fn warn_remote_cleared(reporter: &impl ProgressReporter, d: &ProjectDescriptor) {
    let dir = d.remote_project_dir();
    tracing::warn!(project = %d.name, %dir, "remote project directory cleared before failed copy");
    reporter.warn(&format!(
        "Remote directory {dir} may be empty; {} has no files until the next successful deploy",
        d.primary_unit()
    ));
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
