//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config_file;
pub mod error;
pub mod listing;
pub mod project;
pub mod unit_file;

pub use error::{ConfigError, DescriptorError, RemoteError, ValidationError};
pub use listing::{ServiceRecord, filter_listing};
pub use project::{PrivilegeMode, ProjectDescriptor, ProjectKind};
pub use unit_file::GeneratedUnit;
