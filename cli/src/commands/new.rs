//! `asyd new <server|job> <name>`: create a project and run its first deployment.

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ProjectStore;
use crate::application::services::project::create_project;
use crate::domain::project::{DEFAULT_SERVICE_USER, validate_project_name};
use crate::domain::{ProjectDescriptor, ProjectKind};

#[derive(Args, Debug, Default)]
pub struct NewArgs {
    /// Project kind: a long-running `server` or a scheduled `job`
    pub kind: ProjectKind,

    /// Project name
    pub name: String,

    /// Unit description
    #[arg(long)]
    pub description: Option<String>,

    /// Remote account that runs the service (`root`/`sudo` use the system manager)
    #[arg(long, value_name = "USER")]
    pub user: Option<String>,

    /// Remote endpoint (user@host)
    #[arg(long)]
    pub host: Option<String>,

    /// Local directory copied to the remote host (absolute)
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<String>,

    /// Start script, relative to the working directory
    #[arg(long, value_name = "PATH")]
    pub entry: Option<String>,

    /// systemd OnCalendar expression (jobs only)
    #[arg(long)]
    pub schedule: Option<String>,

    /// ssh identity file
    #[arg(long, value_name = "PATH")]
    pub identity_file: Option<String>,

    /// ssh port
    #[arg(long)]
    pub port: Option<u16>,
}

/// Source of values the operator did not pass as flags.
pub trait Prompt {
    /// Ask for a value; `default` is offered (and returned on empty input).
    fn ask(&self, question: &str, default: Option<&str>, allow_empty: bool) -> Result<String>;
}

/// Interactive prompts on the terminal.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&self, question: &str, default: Option<&str>, allow_empty: bool) -> Result<String> {
        let mut input = dialoguer::Input::<String>::new()
            .with_prompt(question)
            .allow_empty(allow_empty);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input
            .interact_text()
            .with_context(|| format!("reading '{question}'"))
    }
}

/// Non-interactive mode: defaults are accepted, anything else is an error.
pub struct NoPrompt;

impl Prompt for NoPrompt {
    fn ask(&self, question: &str, default: Option<&str>, allow_empty: bool) -> Result<String> {
        match default {
            Some(d) => Ok(d.to_string()),
            None if allow_empty => Ok(String::new()),
            None => anyhow::bail!("missing value for '{question}' (pass it as a flag)"),
        }
    }
}

/// Build a descriptor from flags, asking `prompt` for whatever is missing.
///
/// # Errors
///
/// Returns an error if a required value is missing and cannot be prompted for.
pub fn collect_descriptor(args: NewArgs, prompt: &impl Prompt) -> Result<ProjectDescriptor> {
    let NewArgs {
        kind,
        name,
        description,
        user,
        host,
        workdir,
        entry,
        schedule,
        identity_file,
        port,
    } = args;

    let ask = |value: Option<String>, question: &str, default: Option<&str>, allow_empty: bool| {
        value.map_or_else(|| prompt.ask(question, default, allow_empty), Ok)
    };

    let mut d = ProjectDescriptor::new(&name, kind);
    d.description = ask(description, "Description", None, true)?;
    d.service_user = ask(
        user,
        "Service username (the remote account that runs the service)",
        Some(DEFAULT_SERVICE_USER),
        false,
    )?;
    d.host = ask(host, "Server hostname (user@host)", None, false)?;
    let cwd = std::env::current_dir()
        .ok()
        .map(|p| p.to_string_lossy().into_owned());
    d.working_directory = ask(workdir, "Working directory", cwd.as_deref(), false)?;
    d.entry_point = ask(entry, "Entry point (relative to the working directory)", None, false)?;
    if kind == ProjectKind::Job {
        d.schedule = Some(ask(schedule, "Schedule (systemd OnCalendar)", None, false)?);
    }
    d.identity_file = identity_file.filter(|s| !s.is_empty());
    d.ssh_port = port;
    Ok(d)
}

/// # Errors
///
/// Returns an error if the name is invalid, the project exists, prompting
/// fails, validation fails, or a deployment step fails.
pub async fn run(app: &AppContext, args: NewArgs) -> Result<()> {
    validate_project_name(&args.name)?;
    if app.store.exists(&args.name) {
        anyhow::bail!(
            "project '{}' already exists at {}",
            args.name,
            app.store.project_dir(&args.name).display()
        );
    }

    let descriptor = if app.non_interactive || app.is_json() {
        collect_descriptor(args, &NoPrompt)?
    } else {
        collect_descriptor(args, &TerminalPrompt)?
    };

    let remote = app.remote_for(&descriptor);
    let (descriptor, report) =
        create_project(&remote, &app.store, &app.reporter(), descriptor).await?;

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
