//! asyd - deploy projects as systemd services on remote hosts over ssh

use asyd_cli::cli::Cli;
use asyd_cli::output::json;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "ASYD_LOG";

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;

    if let Err(e) = cli.run().await {
        if json_mode && let Ok(body) = json::format_error(&format!("{e:#}"), json::error_code(&e)) {
            println!("{body}");
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}
