//! JSON output helpers for `--json` code paths.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::deploy::DeployError;
use crate::domain::{ConfigError, DescriptorError, RemoteError, ValidationError};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Machine-readable code for the outermost typed error in `err`'s chain.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| {
            if cause.is::<ValidationError>() {
                Some("VALIDATION_FAILED")
            } else if cause.is::<ConfigError>() {
                Some("CONFIG_INVALID")
            } else if cause.is::<DeployError>() {
                Some("DEPLOY_FAILED")
            } else if cause.is::<RemoteError>() {
                Some("REMOTE_FAILED")
            } else if cause.is::<DescriptorError>() {
                Some("PATHS_NOT_DISCOVERED")
            } else {
                None
            }
        })
        .unwrap_or("ERROR")
}

/// Serialize any value as pretty JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Print `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", to_pretty(value)?);
    Ok(())
}
