//! Project descriptor types and pure validation functions.
//!
//! Free of I/O, async, and outer-layer imports.
//! All functions take data in and return data out.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::domain::error::{DescriptorError, ValidationError};

/// Prefix for every unit this tool installs on a remote host.
pub const NAMESPACE_PREFIX: &str = "asyd-";

/// Directory (relative to the remote home) that holds deployed projects.
pub const REMOTE_BASE_DIR: &str = ".asyd";

/// Service-runner names that select the system-wide service manager.
pub const ROOT_SERVICE_USERS: &[&str] = &["root", "sudo"];

/// Default service-runner name offered by the interactive prompt.
pub const DEFAULT_SERVICE_USER: &str = "sudo";

/// Unit directory used by the system-wide service manager.
pub const SYSTEM_UNIT_DIR: &str = "/etc/systemd/system";

/// Unit directory used by the per-user service manager.
pub const USER_UNIT_DIR: &str = "~/.config/systemd/user";

static PROJECT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: compile-time constant pattern.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,63}$").expect("valid regex")
});

// ── Kinds and modes ───────────────────────────────────────────────────────────

/// Deployment kind: long-running service or scheduled job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    #[default]
    Server,
    Job,
}

impl ProjectKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Job => "job",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(Self::Server),
            "job" => Ok(Self::Job),
            other => Err(ValidationError::InvalidKind(other.to_string())),
        }
    }
}

/// Which service-manager instance a project targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeMode {
    /// System-wide manager, units in `/etc/systemd/system`.
    Root,
    /// Per-user manager (`systemctl --user`), units in `~/.config/systemd/user`.
    User,
}

impl PrivilegeMode {
    /// Derive the mode from the configured service-runner account.
    #[must_use]
    pub fn for_service_user(user: &str) -> Self {
        if ROOT_SERVICE_USERS.contains(&user) {
            Self::Root
        } else {
            Self::User
        }
    }

    /// Remote directory holding installed unit files.
    #[must_use]
    pub fn unit_dir(self) -> &'static str {
        match self {
            Self::Root => SYSTEM_UNIT_DIR,
            Self::User => USER_UNIT_DIR,
        }
    }

    /// Install target for long-running services.
    #[must_use]
    pub fn wanted_by(self) -> &'static str {
        match self {
            Self::Root => "multi-user.target",
            Self::User => "default.target",
        }
    }
}

// ── Descriptor ────────────────────────────────────────────────────────────────

/// In-memory configuration of one project.
///
/// `remote_home` and `remote_shell` are filled by path discovery and must be
/// present before a unit file can be generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDescriptor {
    pub name: String,
    pub kind: ProjectKind,
    pub description: String,
    pub service_user: String,
    /// Remote endpoint in `user@host` form.
    pub host: String,
    pub identity_file: Option<String>,
    pub ssh_port: Option<u16>,
    pub working_directory: String,
    /// Path of the start script relative to the project directory.
    pub entry_point: String,
    /// systemd `OnCalendar` expression, jobs only.
    pub schedule: Option<String>,
    pub remote_home: Option<String>,
    pub remote_shell: Option<String>,
    pub deployed_at: Option<DateTime<Utc>>,
}

impl ProjectDescriptor {
    /// Create an empty descriptor for a new project.
    #[must_use]
    pub fn new(name: &str, kind: ProjectKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: String::new(),
            service_user: DEFAULT_SERVICE_USER.to_string(),
            host: String::new(),
            identity_file: None,
            ssh_port: None,
            working_directory: String::new(),
            entry_point: String::new(),
            schedule: None,
            remote_home: None,
            remote_shell: None,
            deployed_at: None,
        }
    }

    #[must_use]
    pub fn privilege_mode(&self) -> PrivilegeMode {
        PrivilegeMode::for_service_user(&self.service_user)
    }

    /// Installed service unit name, e.g. `asyd-api.service`.
    #[must_use]
    pub fn service_unit(&self) -> String {
        format!("{NAMESPACE_PREFIX}{}.service", self.name)
    }

    /// Installed timer unit name, present for jobs only.
    #[must_use]
    pub fn timer_unit(&self) -> Option<String> {
        (self.kind == ProjectKind::Job).then(|| format!("{NAMESPACE_PREFIX}{}.timer", self.name))
    }

    /// The unit that start/stop/restart/status act on.
    #[must_use]
    pub fn primary_unit(&self) -> String {
        self.timer_unit().unwrap_or_else(|| self.service_unit())
    }

    /// All units installed for this project, primary unit first.
    #[must_use]
    pub fn units(&self) -> Vec<String> {
        let mut units = Vec::with_capacity(2);
        if let Some(timer) = self.timer_unit() {
            units.push(timer);
        }
        units.push(self.service_unit());
        units
    }

    /// Returns `(home, shell)` or an error when discovery has not run.
    ///
    /// # Errors
    ///
    /// Returns `DescriptorError::PathsNotDiscovered` if either path is missing.
    pub fn discovered_paths(&self) -> Result<(&str, &str), DescriptorError> {
        match (self.remote_home.as_deref(), self.remote_shell.as_deref()) {
            (Some(home), Some(shell)) if !home.is_empty() && !shell.is_empty() => Ok((home, shell)),
            _ => Err(DescriptorError::PathsNotDiscovered(self.name.clone())),
        }
    }

    /// `~/.asyd` on the remote host, absolute once discovery has run.
    #[must_use]
    pub fn remote_base_dir(&self) -> String {
        match self.remote_home.as_deref() {
            Some(home) if !home.is_empty() => format!("{home}/{REMOTE_BASE_DIR}"),
            _ => format!("~/{REMOTE_BASE_DIR}"),
        }
    }

    /// Remote directory the project files are copied into.
    #[must_use]
    pub fn remote_project_dir(&self) -> String {
        format!("{}/{}", self.remote_base_dir(), self.name)
    }

    /// Remote path of the entry point script.
    #[must_use]
    pub fn remote_entry_point(&self) -> String {
        format!("{}/{}", self.remote_project_dir(), self.entry_point)
    }

    /// Validate every operator-supplied field.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` encountered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let free_text = [
            ("description", Some(self.description.as_str())),
            ("service user", Some(self.service_user.as_str())),
            ("host", Some(self.host.as_str())),
            ("working directory", Some(self.working_directory.as_str())),
            ("entry point", Some(self.entry_point.as_str())),
            ("identity file", self.identity_file.as_deref()),
            ("schedule", self.schedule.as_deref()),
        ];
        for (field, value) in free_text {
            if let Some(value) = value {
                validate_single_line(field, value)?;
            }
        }
        validate_project_name(&self.name)?;
        validate_host(&self.host)?;
        validate_working_directory(&self.working_directory)?;
        validate_entry_point(&self.entry_point)?;
        if self.kind == ProjectKind::Job
            && self.schedule.as_deref().is_none_or(|s| s.trim().is_empty())
        {
            return Err(ValidationError::MissingSchedule);
        }
        Ok(())
    }
}

// ── Validators ────────────────────────────────────────────────────────────────

/// Reject names that could escape the project store or the remote base dir.
///
/// # Errors
///
/// Returns `ValidationError::InvalidProjectName` for empty names, names
/// containing `..` or a path separator, or characters outside `[A-Za-z0-9_.-]`.
pub fn validate_project_name(name: &str) -> Result<(), ValidationError> {
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(ValidationError::InvalidProjectName(name.to_string()));
    }
    if !PROJECT_NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidProjectName(name.to_string()));
    }
    Ok(())
}

/// Values are written verbatim into `config.cfg` and the unit files, one
/// setting per line.
///
/// # Errors
///
/// Returns `ValidationError::ControlCharacter` if `value` contains a line
/// break or any other control character.
pub fn validate_single_line(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacter { field });
    }
    Ok(())
}

/// # Errors
///
/// Returns `ValidationError::RelativeWorkingDirectory` unless `path` starts with `/`.
pub fn validate_working_directory(path: &str) -> Result<(), ValidationError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ValidationError::RelativeWorkingDirectory(path.to_string()))
    }
}

/// The entry point is embedded in `ExecStart`, so it must stay a plain
/// relative path.
///
/// # Errors
///
/// Returns `ValidationError::InvalidEntryPoint` describing the violated rule.
pub fn validate_entry_point(path: &str) -> Result<(), ValidationError> {
    let reason = if path.is_empty() {
        Some("must not be empty")
    } else if path.starts_with('/') {
        Some("must be relative to the working directory")
    } else if path.split('/').any(|c| c == "..") {
        Some("must not contain '..'")
    } else if path
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '\\'))
    {
        Some("must not contain whitespace or quotes")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ValidationError::InvalidEntryPoint {
            path: path.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// # Errors
///
/// Returns `ValidationError::InvalidHost` for empty hosts or hosts with whitespace.
pub fn validate_host(host: &str) -> Result<(), ValidationError> {
    if host.is_empty() || host.chars().any(char::is_whitespace) || host.starts_with('-') {
        return Err(ValidationError::InvalidHost(host.to_string()));
    }
    Ok(())
}
