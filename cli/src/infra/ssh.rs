//! Infrastructure implementation of the `RemoteHost` port traits.
//!
//! `SshHost<R>` routes every remote operation through `ssh`/`scp` via a
//! `CommandRunner`, scoping service-manager calls by privilege mode.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, RemoteFiles, RemoteInspector, RemotePaths, ServiceAction, ServiceManager,
};
use crate::domain::{PrivilegeMode, ProjectDescriptor, RemoteError};
use crate::infra::command::{CommandLine, CommandOutput, remote_command};
use crate::infra::command_runner::MIN_COPY_TIMEOUT;

/// Seconds ssh waits for the TCP connection before giving up.
const CONNECT_TIMEOUT_SECS: u32 = 10;

/// Label printed by `whereis bash` before the paths.
const SHELL_LABEL: &str = "bash:";

/// `systemctl status` exit code for an inactive (but known) unit.
const STATUS_INACTIVE: i32 = 3;

/// Connection parameters shared by ssh and scp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    /// `user@host`
    pub destination: String,
    pub identity_file: Option<String>,
    pub port: Option<u16>,
}

impl SshTarget {
    #[must_use]
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            identity_file: None,
            port: None,
        }
    }

    #[must_use]
    pub fn for_project(d: &ProjectDescriptor) -> Self {
        Self {
            destination: d.host.clone(),
            identity_file: d.identity_file.clone(),
            port: d.ssh_port,
        }
    }

    fn common_options(&self, port_flag: &str) -> Vec<String> {
        let mut args = vec!["-o".to_string(), "BatchMode=yes".to_string()];
        if let Some(identity) = &self.identity_file {
            args.push("-i".to_string());
            args.push(identity.clone());
        }
        if let Some(port) = self.port {
            args.push(port_flag.to_string());
            args.push(port.to_string());
        }
        args
    }

    /// `ssh <options> <destination> '<escaped command>'`
    #[must_use]
    pub fn ssh(&self, remote_args: &[&str]) -> CommandLine {
        CommandLine::new("ssh")
            .args(self.common_options("-p"))
            .arg("-o")
            .arg(format!("ConnectTimeout={CONNECT_TIMEOUT_SECS}"))
            .arg(&self.destination)
            .arg(remote_command(remote_args))
    }

    /// `scp -rp <options> <local> <destination>:<remote>`
    #[must_use]
    pub fn scp(&self, local: &Path, remote: &str) -> CommandLine {
        CommandLine::new("scp")
            .arg("-rp")
            .args(self.common_options("-P"))
            .arg(local.to_string_lossy())
            .arg(format!("{}:{remote}", self.destination))
    }
}

/// Infrastructure adapter implementing `RemoteHost` over ssh/scp/systemctl.
///
/// Generic over `R: CommandRunner` so that tests can inject a recording
/// runner without spawning real processes.
pub struct SshHost<R: CommandRunner> {
    runner: R,
    target: SshTarget,
    mode: PrivilegeMode,
    copy_timeout: Duration,
}

impl<R: CommandRunner> SshHost<R> {
    pub fn new(runner: R, target: SshTarget, mode: PrivilegeMode) -> Self {
        Self {
            runner,
            target,
            mode,
            copy_timeout: MIN_COPY_TIMEOUT,
        }
    }

    /// Host for an existing project descriptor.
    pub fn for_project(runner: R, d: &ProjectDescriptor) -> Self {
        Self::new(runner, SshTarget::for_project(d), d.privilege_mode())
    }

    #[must_use]
    pub fn with_copy_timeout(mut self, timeout: Duration) -> Self {
        self.copy_timeout = timeout;
        self
    }

    #[must_use]
    pub fn mode(&self) -> PrivilegeMode {
        self.mode
    }

    async fn remote(&self, operation: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = self
            .target
            .ssh(args)
            .execute(&self.runner)
            .await
            .with_context(|| format!("{operation} on {}", self.target.destination))?;
        Ok(output.check(operation)?)
    }

    async fn copy(&self, operation: &str, local: &Path, remote: &str) -> Result<()> {
        self.target
            .scp(local, remote)
            .execute_with_timeout(&self.runner, self.copy_timeout)
            .await
            .with_context(|| format!("{operation} to {}", self.target.destination))?
            .check(operation)?;
        Ok(())
    }

    fn systemctl<'a>(&self, tail: &[&'a str]) -> Vec<&'a str> {
        let mut args = vec!["systemctl"];
        if self.mode == PrivilegeMode::User {
            args.push("--user");
        }
        args.extend_from_slice(tail);
        args
    }

    fn installed_unit_path(&self, unit: &str) -> String {
        format!("{}/{unit}", self.mode.unit_dir())
    }
}

/// Extract the first path after the `bash:` label of `whereis` output.
#[must_use]
pub fn parse_shell_locator(output: &str) -> Option<&str> {
    let start = output.find(SHELL_LABEL)? + SHELL_LABEL.len();
    output[start..].split_whitespace().next()
}

impl<R: CommandRunner> RemoteInspector for SshHost<R> {
    async fn discover_paths(&self) -> Result<RemotePaths> {
        let home = self.remote("fetch remote home directory", &["pwd"]).await?;
        let home = home.stdout.trim().to_string();
        if !home.starts_with('/') {
            return Err(RemoteError::UnexpectedOutput {
                operation: "fetch remote home directory".into(),
                output: home,
            }
            .into());
        }

        let locator = self.remote("locate remote shell", &["whereis", "bash"]).await?;
        let shell = parse_shell_locator(&locator.stdout)
            .map(str::to_string)
            .ok_or_else(|| RemoteError::UnexpectedOutput {
                operation: "locate remote shell".into(),
                output: locator.stdout.clone(),
            })?;

        tracing::debug!(%home, %shell, "discovered remote paths");
        Ok(RemotePaths { home, shell })
    }
}

impl<R: CommandRunner> RemoteFiles for SshHost<R> {
    async fn create_directory(&self, path: &str) -> Result<()> {
        self.remote("create remote directory", &["mkdir", "-p", path])
            .await
            .map(drop)
    }

    async fn remove_directory(&self, path: &str) -> Result<()> {
        self.remote("remove remote directory", &["rm", "-rf", path])
            .await
            .map(drop)
    }

    async fn chmod(&self, mode: &str, path: &str) -> Result<()> {
        self.remote("change remote permissions", &["chmod", mode, path])
            .await
            .map(drop)
    }

    async fn copy_tree(&self, local: &Path, remote: &str) -> Result<()> {
        self.copy("copy project files", local, remote).await
    }
}

impl<R: CommandRunner> ServiceManager for SshHost<R> {
    async fn install_unit_file(&self, local_dir: &Path, unit: &str) -> Result<()> {
        let target = match self.mode {
            PrivilegeMode::Root => self.installed_unit_path(unit),
            PrivilegeMode::User => {
                self.create_directory(self.mode.unit_dir()).await?;
                // scp resolves relative remote paths against the login home.
                let dir = self.mode.unit_dir().trim_start_matches("~/");
                format!("{dir}/{unit}")
            }
        };
        self.copy("install unit file", &local_dir.join(unit), &target)
            .await
    }

    async fn remove_unit_file(&self, unit: &str) -> Result<()> {
        let path = self.installed_unit_path(unit);
        self.remote("remove unit file", &["rm", "-f", &path])
            .await
            .map(drop)
    }

    async fn service_action(&self, action: ServiceAction, unit: &str) -> Result<()> {
        let mut tail = vec![action.verb()];
        if action.takes_unit() {
            tail.push(unit);
        }
        let operation = format!("{action} {unit}");
        self.remote(operation.trim_end(), &self.systemctl(&tail))
            .await
            .map(drop)
    }

    async fn check_status(&self, unit: &str) -> Result<String> {
        let args = self.systemctl(&["status", "--no-pager", unit]);
        let output = self
            .target
            .ssh(&args)
            .execute(&self.runner)
            .await
            .with_context(|| format!("status of {unit} on {}", self.target.destination))?;
        match output.code() {
            Some(0 | STATUS_INACTIVE) => Ok(output.stdout),
            _ => Err(output.into_error("check service status").into()),
        }
    }

    async fn list_services(&self) -> Result<String> {
        let args = self.systemctl(&["list-units", "--type=service", "--all", "--no-pager"]);
        let output = self.remote("list services", &args).await?;
        Ok(output.stdout)
    }
}
