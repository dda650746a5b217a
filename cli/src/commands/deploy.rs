//! `asyd deploy <name>`: redeploy an existing project.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::project::redeploy_project;
use crate::commands::{ProjectArgs, load_project};

/// # Errors
///
/// Returns an error if the project cannot be loaded or any deployment step fails.
pub async fn run(app: &AppContext, args: &ProjectArgs) -> Result<()> {
    let descriptor = load_project(app, &args.name)?;
    let remote = app.remote_for(&descriptor);
    let (descriptor, report) =
        redeploy_project(&remote, &app.store, &app.reporter(), descriptor).await?;

    if app.is_json() {
        crate::output::json::print(&serde_json::json!({
            "project": descriptor,
            "report": report,
        }))?;
    } else {
        app.renderer().render_deploy(&descriptor, &report);
    }
    Ok(())
}
