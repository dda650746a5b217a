//! Flat `key=value` codec for `~/.asyd/<name>/config.cfg`.
//!
//! Pure functions only; no I/O, no async, no filesystem access.

use chrono::{DateTime, Utc};

use crate::domain::error::ConfigError;
use crate::domain::project::{ProjectDescriptor, ProjectKind};

pub const KIND_KEY: &str = "config_type";

/// A settable descriptor field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Description,
    ServiceUser,
    Host,
    IdentityFile,
    SshPort,
    WorkingDirectory,
    EntryPoint,
    Schedule,
    RemoteHome,
    RemoteShell,
    DeployedAt,
}

/// Every recognised key, in the order they are written.
const FIELDS: &[(&str, Field)] = &[
    ("project_description", Field::Description),
    ("service_username", Field::ServiceUser),
    ("server_hostname", Field::Host),
    ("identity_file", Field::IdentityFile),
    ("ssh_port", Field::SshPort),
    ("working_directory", Field::WorkingDirectory),
    ("entry_point", Field::EntryPoint),
    ("schedule", Field::Schedule),
    ("server_home_directory", Field::RemoteHome),
    ("server_shell_path", Field::RemoteShell),
    ("deployed_at", Field::DeployedAt),
];

impl Field {
    fn lookup(key: &str) -> Option<(&'static str, Self)> {
        FIELDS.iter().copied().find(|(k, _)| *k == key)
    }

    fn allowed_for(self, kind: ProjectKind) -> bool {
        !(self == Self::Schedule && kind != ProjectKind::Job)
    }

    fn assign(
        self,
        d: &mut ProjectDescriptor,
        key: &'static str,
        value: &str,
        line: usize,
    ) -> Result<(), ConfigError> {
        let optional = || (!value.is_empty()).then(|| value.to_string());
        match self {
            Self::Description => d.description = value.to_string(),
            Self::ServiceUser => d.service_user = value.to_string(),
            Self::Host => d.host = value.to_string(),
            Self::IdentityFile => d.identity_file = optional(),
            Self::SshPort => {
                d.ssh_port = if value.is_empty() {
                    None
                } else {
                    Some(value.parse().map_err(|_| invalid(key, value, line))?)
                };
            }
            Self::WorkingDirectory => d.working_directory = value.to_string(),
            Self::EntryPoint => d.entry_point = value.to_string(),
            Self::Schedule => d.schedule = optional(),
            Self::RemoteHome => d.remote_home = optional(),
            Self::RemoteShell => d.remote_shell = optional(),
            Self::DeployedAt => {
                d.deployed_at = if value.is_empty() {
                    None
                } else {
                    let ts = DateTime::parse_from_rfc3339(value)
                        .map_err(|_| invalid(key, value, line))?;
                    Some(ts.with_timezone(&Utc))
                };
            }
        }
        Ok(())
    }

    fn value(self, d: &ProjectDescriptor) -> String {
        match self {
            Self::Description => d.description.clone(),
            Self::ServiceUser => d.service_user.clone(),
            Self::Host => d.host.clone(),
            Self::IdentityFile => d.identity_file.clone().unwrap_or_default(),
            Self::SshPort => d.ssh_port.map(|p| p.to_string()).unwrap_or_default(),
            Self::WorkingDirectory => d.working_directory.clone(),
            Self::EntryPoint => d.entry_point.clone(),
            Self::Schedule => d.schedule.clone().unwrap_or_default(),
            Self::RemoteHome => d.remote_home.clone().unwrap_or_default(),
            Self::RemoteShell => d.remote_shell.clone().unwrap_or_default(),
            Self::DeployedAt => d.deployed_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        }
    }
}

fn invalid(key: &'static str, value: &str, line: usize) -> ConfigError {
    ConfigError::InvalidValue {
        line,
        key,
        value: value.to_string(),
    }
}

/// Split a line at the first `=`.
fn split_line(line: usize, content: &str) -> Result<(&str, &str), ConfigError> {
    content
        .split_once('=')
        .ok_or_else(|| ConfigError::MalformedLine {
            line,
            content: content.to_string(),
        })
}

/// Parse the persisted config of project `name`.
///
/// # Errors
///
/// Returns a `ConfigError` for malformed lines, unknown keys, keys not valid
/// for the project kind, unparsable values, or a missing `config_type`.
pub fn parse(name: &str, text: &str) -> Result<ProjectDescriptor, ConfigError> {
    let mut entries = Vec::new();
    let mut kind = None;
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.trim_end_matches('\r');
        if content.trim().is_empty() {
            continue;
        }
        let (key, value) = split_line(line, content)?;
        if key == KIND_KEY {
            kind = Some(value.parse::<ProjectKind>().map_err(|_| ConfigError::InvalidValue {
                line,
                key: KIND_KEY,
                value: value.to_string(),
            })?);
        } else {
            entries.push((line, key, value));
        }
    }

    let kind = kind.ok_or(ConfigError::MissingKey(KIND_KEY))?;
    let mut descriptor = ProjectDescriptor::new(name, kind);
    for (line, key, value) in entries {
        let (key, field) = Field::lookup(key).ok_or_else(|| ConfigError::UnknownKey {
            line,
            key: key.to_string(),
        })?;
        if !field.allowed_for(kind) {
            return Err(ConfigError::KeyNotAllowedForKind {
                line,
                key: key.to_string(),
                kind: kind.as_str(),
            });
        }
        field.assign(&mut descriptor, key, value, line)?;
    }
    Ok(descriptor)
}

/// Render a descriptor in the persisted format (one `key=value` per line).
#[must_use]
pub fn render(d: &ProjectDescriptor) -> String {
    let mut out = format!("{KIND_KEY}={}\n", d.kind);
    for (key, field) in FIELDS {
        if field.allowed_for(d.kind) {
            out.push_str(key);
            out.push('=');
            out.push_str(&field.value(d));
            out.push('\n');
        }
    }
    out
}
