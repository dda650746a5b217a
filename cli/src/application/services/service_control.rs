//! Application service: start/stop/restart/status and unit removal.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, ServiceAction, ServiceManager};
use crate::domain::ProjectDescriptor;

/// Stop `unit`, then delete its installed file.
///
/// Fail-fast: when the stop fails the unit file is left in place.
///
/// # Errors
///
/// Returns an error naming the sub-step that failed.
pub async fn remove_service(remote: &impl ServiceManager, unit: &str) -> Result<()> {
    remote
        .service_action(ServiceAction::Stop, unit)
        .await
        .with_context(|| format!("stopping {unit}"))?;
    remote
        .remove_unit_file(unit)
        .await
        .with_context(|| format!("removing unit file {unit}"))?;
    Ok(())
}

/// Issue `action` against the project's primary unit.
///
/// # Errors
///
/// Returns an error if the remote service manager rejects the action.
pub async fn control(
    remote: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    descriptor: &ProjectDescriptor,
    action: ServiceAction,
) -> Result<()> {
    let unit = descriptor.primary_unit();
    reporter.step(&format!("Running {action} on {unit}..."));
    tracing::info!(project = %descriptor.name, %unit, %action, "service action");
    remote
        .service_action(action, &unit)
        .await
        .with_context(|| format!("{action} {}", descriptor.name))?;
    reporter.success(&format!("{action} {unit}"));
    Ok(())
}

/// Raw status text of the project's primary unit.
///
/// # Errors
///
/// Returns an error if the status cannot be fetched.
pub async fn status(remote: &impl ServiceManager, descriptor: &ProjectDescriptor) -> Result<String> {
    let unit = descriptor.primary_unit();
    remote
        .check_status(&unit)
        .await
        .with_context(|| format!("status of {}", descriptor.name))
}
