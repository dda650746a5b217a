//! `asyd remove <name>`: tear down a project remotely and locally.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::project::remove_project;
use crate::commands::{ProjectArgs, load_project};

/// # Errors
///
/// Returns an error if the project cannot be loaded or any removal step fails.
pub async fn run(app: &AppContext, args: &ProjectArgs) -> Result<()> {
    let descriptor = load_project(app, &args.name)?;

    let prompt = format!(
        "Remove '{}' ({}) from {} and delete its local config?",
        descriptor.name,
        descriptor.primary_unit(),
        descriptor.host
    );
    if !app.confirm(&prompt, false)? {
        app.output.info("Aborted.");
        return Ok(());
    }

    let remote = app.remote_for(&descriptor);
    remove_project(&remote, &app.store, &app.reporter(), &descriptor).await?;

    if app.is_json() {
        crate::output::json::print(&serde_json::json!({ "removed": descriptor.name }))?;
    }
    Ok(())
}
