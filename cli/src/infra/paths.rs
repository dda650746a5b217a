//! Local store location.

use std::path::PathBuf;

use anyhow::Result;

/// Environment variable overriding the store root.
pub const HOME_ENV: &str = "ASYD_HOME";

/// Store directory name under the user's home.
pub const STORE_DIR: &str = ".asyd";

/// Resolve the local store root: `$ASYD_HOME` when set, else `~/.asyd`.
///
/// # Errors
///
/// Returns an error if neither the override nor a home directory is available.
pub fn store_root() -> Result<PathBuf> {
    store_root_from(std::env::var_os(HOME_ENV).map(PathBuf::from), dirs::home_dir())
}

/// Resolution with both inputs injected.
///
/// # Errors
///
/// Returns an error if both inputs are `None` (or the override is empty and
/// home is `None`).
pub fn store_root_from(overridden: Option<PathBuf>, home: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = overridden.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(root);
    }
    home.map(|h| h.join(STORE_DIR))
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory (set {HOME_ENV})"))
}
