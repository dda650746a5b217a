//! Application service for the project lifecycle: create, redeploy, remove, list.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::ports::{ProgressReporter, ProjectStore, RemoteHost, ServiceAction};
use crate::application::services::deploy::{DeployOptions, DeployReport, deploy};
use crate::application::services::service_control::remove_service;
use crate::domain::{ProjectDescriptor, ProjectKind};

/// Validate, create the local project, and run the first deployment.
///
/// Nothing is written before validation passes. A failing deployment removes
/// the freshly created local project again.
///
/// # Errors
///
/// Returns a `ValidationError`, a store error (e.g. project exists), or a
/// `DeployError`.
pub async fn create_project(
    remote: &impl RemoteHost,
    store: &impl ProjectStore,
    reporter: &impl ProgressReporter,
    mut descriptor: ProjectDescriptor,
) -> Result<(ProjectDescriptor, DeployReport)> {
    descriptor.validate()?;
    store.create(&descriptor.name)?;
    let report = deploy(remote, store, reporter, &mut descriptor, DeployOptions::initial()).await?;
    Ok((descriptor, report))
}

/// Deploy an existing project again, replacing the remote files.
///
/// # Errors
///
/// Returns a `ValidationError` or a `DeployError`.
pub async fn redeploy_project(
    remote: &impl RemoteHost,
    store: &impl ProjectStore,
    reporter: &impl ProgressReporter,
    mut descriptor: ProjectDescriptor,
) -> Result<(ProjectDescriptor, DeployReport)> {
    descriptor.validate()?;
    let report = deploy(remote, store, reporter, &mut descriptor, DeployOptions::redeploy()).await?;
    Ok((descriptor, report))
}

/// Remove the project's units, remote files, and local record, in that order.
///
/// # Errors
///
/// Returns the first failing operation; later steps are not attempted.
pub async fn remove_project(
    remote: &impl RemoteHost,
    store: &impl ProjectStore,
    reporter: &impl ProgressReporter,
    descriptor: &ProjectDescriptor,
) -> Result<()> {
    for unit in descriptor.units() {
        reporter.step(&format!("Removing {unit}..."));
        remove_service(remote, &unit).await?;
    }
    remote
        .service_action(ServiceAction::Reload, "")
        .await
        .context("reloading service manager")?;

    let remote_dir = descriptor.remote_project_dir();
    reporter.step(&format!("Removing {remote_dir}..."));
    remote
        .remove_directory(&remote_dir)
        .await
        .context("removing remote project directory")?;

    store.remove(&descriptor.name)?;
    tracing::info!(project = %descriptor.name, "project removed");
    reporter.success(&format!("Removed {}", descriptor.name));
    Ok(())
}

/// One line of `asyd projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub kind: ProjectKind,
    pub host: String,
    pub deployed_at: Option<DateTime<Utc>>,
}

/// Summaries of every stored project; unreadable configs are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the store itself cannot be listed.
pub fn list_projects(store: &impl ProjectStore) -> Result<Vec<ProjectSummary>> {
    let mut out = Vec::new();
    for name in store.list()? {
        match store.load(&name) {
            Ok(d) => out.push(ProjectSummary {
                name: d.name,
                kind: d.kind,
                host: d.host,
                deployed_at: d.deployed_at,
            }),
            Err(e) => tracing::warn!(project = %name, "skipping unreadable project: {e:#}"),
        }
    }
    Ok(out)
}
