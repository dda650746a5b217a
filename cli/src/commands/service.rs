//! `asyd start|stop|restart <name>`

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::ServiceAction;
use crate::application::services::service_control::control;
use crate::commands::{ProjectArgs, load_project};

/// # Errors
///
/// Returns an error if the project cannot be loaded or the action fails remotely.
pub async fn run(app: &AppContext, args: &ProjectArgs, action: ServiceAction) -> Result<()> {
    let descriptor = load_project(app, &args.name)?;
    let remote = app.remote_for(&descriptor);
    control(&remote, &app.reporter(), &descriptor, action).await?;

    if app.is_json() {
        crate::output::json::print(&serde_json::json!({
            "project": descriptor.name,
            "unit": descriptor.primary_unit(),
            "action": action.verb(),
        }))?;
    }
    Ok(())
}
