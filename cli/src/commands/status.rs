//! `asyd status <name>`: raw remote status of the primary unit.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::service_control::status;
use crate::commands::{ProjectArgs, load_project};
use crate::output::progress;

/// # Errors
///
/// Returns an error if the project cannot be loaded or the status cannot be fetched.
pub async fn run(app: &AppContext, args: &ProjectArgs) -> Result<()> {
    let descriptor = load_project(app, &args.name)?;
    let remote = app.remote_for(&descriptor);

    let pb = progress::maybe_spinner(
        app.output.show_progress(),
        &format!("Fetching status from {}...", descriptor.host),
    );
    let result = status(&remote, &descriptor).await;
    if let Some(pb) = &pb {
        progress::finish_clear(pb);
    }
    let text = result?;

    if app.is_json() {
        crate::output::json::print(&serde_json::json!({
            "project": descriptor.name,
            "unit": descriptor.primary_unit(),
            "status": text,
        }))?;
    } else {
        app.renderer().render_status(&text);
    }
    Ok(())
}
