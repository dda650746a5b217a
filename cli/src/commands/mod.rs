//! Command implementations

pub mod deploy;
pub mod list;
pub mod new;
pub mod projects;
pub mod remove;
pub mod service;
pub mod status;
pub mod version;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ProjectStore;
use crate::domain::ProjectDescriptor;
use crate::domain::project::validate_project_name;

/// Arguments for commands that act on one existing project.
#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project name
    pub name: String,
}

/// Validate `name` and load its stored descriptor.
///
/// # Errors
///
/// Returns a `ValidationError` for bad names, or a store error when the
/// project does not exist or its config cannot be parsed.
pub fn load_project(app: &AppContext, name: &str) -> Result<ProjectDescriptor> {
    validate_project_name(name)?;
    app.store.load(name)
}
