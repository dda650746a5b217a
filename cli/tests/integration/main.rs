//! Integration tests for asyd CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them reach a remote host: every case fails or finishes before ssh.

mod cli_tests;
mod project_commands;
