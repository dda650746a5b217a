//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Validation errors ─────────────────────────────────────────────────────────

/// Operator-supplied values rejected before any local or remote side effect.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "Invalid project name '{0}': use 1-64 characters from [A-Za-z0-9_.-], no '..' or '/'"
    )]
    InvalidProjectName(String),

    #[error("Working directory '{0}' must be an absolute path starting with '/'")]
    RelativeWorkingDirectory(String),

    #[error("Invalid entry point '{path}': {reason}")]
    InvalidEntryPoint { path: String, reason: &'static str },

    #[error("Invalid host '{0}': expected user@host without whitespace")]
    InvalidHost(String),

    #[error("Invalid project kind '{0}': must be one of 'server' or 'job'")]
    InvalidKind(String),

    #[error("A schedule is required for job projects (systemd OnCalendar format)")]
    MissingSchedule,

    #[error("The {field} must be a single line without control characters")]
    ControlCharacter { field: &'static str },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while reading a persisted `config.cfg`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("line {line}: unknown setting '{key}'")]
    UnknownKey { line: usize, key: String },

    #[error("line {line}: setting '{key}' is not valid for {kind} projects")]
    KeyNotAllowedForKind {
        line: usize,
        key: String,
        kind: &'static str,
    },

    #[error("line {line}: expected key=value, got '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("missing required setting '{0}'")]
    MissingKey(&'static str),

    #[error("line {line}: invalid value for {key}: '{value}'")]
    InvalidValue {
        line: usize,
        key: &'static str,
        value: String,
    },
}

// ── Descriptor errors ─────────────────────────────────────────────────────────

/// Errors raised when a descriptor is used before it is complete.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error(
        "Remote paths for project '{0}' have not been discovered. Re-run deployment to fetch them."
    )]
    PathsNotDiscovered(String),
}

// ── Remote errors ─────────────────────────────────────────────────────────────

/// A remote operation that ran but did not succeed.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("{operation} failed ({program} exited with {}){}", display_code(*.code), display_stderr(.stderr))]
    CommandFailed {
        operation: String,
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{operation}: unexpected output '{output}'")]
    UnexpectedOutput { operation: String, output: String },
}

fn display_code(code: Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}"))
}

fn display_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}
