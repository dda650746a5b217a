//! CLI argument parsing with clap derive

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::application::ports::ServiceAction;
use crate::commands;
use crate::infra::command_runner::DEFAULT_CMD_TIMEOUT;

/// Deploy projects as systemd services on remote hosts over ssh
#[derive(Parser)]
#[command(
    name = "asyd",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log every remote command (overridden by ASYD_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Timeout in seconds for each remote command
    #[arg(long, global = true, env = "ASYD_TIMEOUT", default_value_t = DEFAULT_CMD_TIMEOUT.as_secs(), value_name = "SECS")]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a project and deploy it
    New(commands::new::NewArgs),

    /// Redeploy an existing project
    Deploy(commands::ProjectArgs),

    /// Remove a project from the remote host and locally
    Remove(commands::ProjectArgs),

    /// Start a project's unit
    Start(commands::ProjectArgs),

    /// Stop a project's unit
    Stop(commands::ProjectArgs),

    /// Restart a project's unit
    Restart(commands::ProjectArgs),

    /// Show the remote status of a project's unit
    Status(commands::ProjectArgs),

    /// List units managed by asyd on a host
    List(commands::list::ListArgs),

    /// List local projects
    Projects,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            yes,
            timeout,
            command,
        } = self;

        if matches!(command, Command::Version) {
            return commands::version::run(json);
        }

        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags {
                yes,
                timeout: Duration::from_secs(timeout),
            },
        })?;

        match command {
            Command::New(args) => commands::new::run(&app, args).await,
            Command::Deploy(args) => commands::deploy::run(&app, &args).await,
            Command::Remove(args) => commands::remove::run(&app, &args).await,
            Command::Start(args) => commands::service::run(&app, &args, ServiceAction::Start).await,
            Command::Stop(args) => commands::service::run(&app, &args, ServiceAction::Stop).await,
            Command::Restart(args) => {
                commands::service::run(&app, &args, ServiceAction::Restart).await
            }
            Command::Status(args) => commands::status::run(&app, &args).await,
            Command::List(args) => commands::list::run(&app, &args).await,
            Command::Projects => commands::projects::run(&app),
            Command::Version => commands::version::run(json),
        }
    }
}
