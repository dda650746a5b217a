//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, remote
//! access over ssh/scp, and the local project store.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command;
pub mod command_runner;
pub mod paths;
pub mod ssh;
pub mod store;
