//! Application service: list managed units on a host.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::ServiceManager;
use crate::domain::ServiceRecord;
use crate::domain::listing::{filter_listing, managed_records};

/// Filtered listing in both display and structured form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedListing {
    /// Header plus one bullet line per managed unit.
    pub text: String,
    pub records: Vec<ServiceRecord>,
}

/// Fetch the remote unit listing and keep only loaded, managed units.
///
/// # Errors
///
/// Returns an error if the listing cannot be fetched.
pub async fn list_managed(remote: &impl ServiceManager) -> Result<ManagedListing> {
    let raw = remote.list_services().await.context("listing remote units")?;
    Ok(ManagedListing {
        text: filter_listing(&raw),
        records: managed_records(&raw),
    })
}
