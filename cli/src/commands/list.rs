//! `asyd list <host>`: units managed by asyd on a host.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::listing::list_managed;
use crate::domain::PrivilegeMode;
use crate::domain::project::validate_host;
use crate::infra::ssh::SshTarget;
use crate::output::progress;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Remote endpoint (user@host)
    pub host: String,

    /// List the per-user service manager instead of the system one
    #[arg(long)]
    pub user: bool,

    /// ssh identity file
    #[arg(long, short = 'i', value_name = "PATH")]
    pub identity_file: Option<String>,

    /// ssh port
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

/// # Errors
///
/// Returns an error if the host is invalid or the listing cannot be fetched.
pub async fn run(app: &AppContext, args: &ListArgs) -> Result<()> {
    validate_host(&args.host)?;
    let target = SshTarget {
        destination: args.host.clone(),
        identity_file: args.identity_file.clone(),
        port: args.port,
    };
    let mode = if args.user {
        PrivilegeMode::User
    } else {
        PrivilegeMode::Root
    };
    let remote = app.remote_at(target, mode);

    let pb = progress::maybe_spinner(
        app.output.show_progress(),
        &format!("Listing units on {}...", args.host),
    );
    let result = list_managed(&remote).await;
    match (&pb, &result) {
        (Some(pb), Ok(listing)) => progress::finish_ok(
            pb,
            &format!("{} managed units on {}", listing.records.len(), args.host),
        ),
        (Some(pb), Err(_)) => progress::finish_clear(pb),
        (None, _) => {}
    }
    let listing = result?;

    if app.is_json() {
        crate::output::json::print(&listing.records)?;
    } else if listing.records.is_empty() {
        app.output
            .warn(&format!("No units managed by asyd on {}", args.host));
    } else {
        app.renderer().render_listing(&listing.text);
    }
    Ok(())
}
