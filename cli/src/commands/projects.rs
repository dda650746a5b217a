//! `asyd projects`: list local projects.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::project::list_projects;

/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn run(app: &AppContext) -> Result<()> {
    let projects = list_projects(&app.store)?;
    if app.is_json() {
        crate::output::json::print(&projects)?;
    } else {
        app.renderer().render_projects(&projects);
    }
    Ok(())
}
