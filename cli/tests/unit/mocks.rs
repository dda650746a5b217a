//! Recording test doubles for the port traits.

#![allow(dead_code)]

use std::collections::{BTreeSet, VecDeque};
use std::path::Path;
use std::process::Output;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use asyd_cli::application::ports::{
    CommandRunner, RemoteFiles, RemoteInspector, RemotePaths, ServiceAction, ServiceManager,
};
use asyd_cli::domain::RemoteError;

use crate::helpers::ok_output;

// ── StubRemote ───────────────────────────────────────────────────────────────

/// In-memory remote host. Every call is recorded as `"<op> <arg>"`; the
/// operation named by `fail_on` returns a `RemoteError` instead.
pub struct StubRemote {
    pub paths: RemotePaths,
    fail_on: Option<&'static str>,
    calls: Mutex<Vec<String>>,
    installed: Mutex<BTreeSet<String>>,
    listing: String,
    status: String,
}

impl StubRemote {
    pub fn new() -> Self {
        Self {
            paths: RemotePaths {
                home: "/home/deploy".into(),
                shell: "/usr/bin/bash".into(),
            },
            fail_on: None,
            calls: Mutex::new(Vec::new()),
            installed: Mutex::new(BTreeSet::new()),
            listing: String::new(),
            status: String::new(),
        }
    }

    /// Fail the first (and every) call of operation `op`, e.g. `"copy_tree"` or `"stop"`.
    pub fn failing_on(op: &'static str) -> Self {
        Self {
            fail_on: Some(op),
            ..Self::new()
        }
    }

    pub fn with_installed(self, units: &[&str]) -> Self {
        self.installed
            .lock()
            .expect("lock")
            .extend(units.iter().map(|u| (*u).to_string()));
        self
    }

    pub fn with_listing(mut self, listing: &str) -> Self {
        self.listing = listing.to_string();
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    /// Operation names only, in call order.
    pub fn ops(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn installed(&self) -> Vec<String> {
        self.installed.lock().expect("lock").iter().cloned().collect()
    }

    fn record(&self, op: &'static str, detail: &str) -> Result<()> {
        let call = format!("{op} {detail}");
        self.calls
            .lock()
            .expect("lock")
            .push(call.trim_end().to_string());
        if self.fail_on == Some(op) {
            return Err(RemoteError::CommandFailed {
                operation: op.to_string(),
                program: "ssh".into(),
                code: Some(1),
                stderr: format!("{op} failed"),
            }
            .into());
        }
        Ok(())
    }
}

impl RemoteInspector for StubRemote {
    async fn discover_paths(&self) -> Result<RemotePaths> {
        self.record("discover_paths", "")?;
        Ok(self.paths.clone())
    }
}

impl RemoteFiles for StubRemote {
    async fn create_directory(&self, path: &str) -> Result<()> {
        self.record("create_directory", path)
    }

    async fn remove_directory(&self, path: &str) -> Result<()> {
        self.record("remove_directory", path)
    }

    async fn chmod(&self, mode: &str, path: &str) -> Result<()> {
        self.record("chmod", &format!("{mode} {path}"))
    }

    async fn copy_tree(&self, local: &Path, remote: &str) -> Result<()> {
        self.record("copy_tree", &format!("{} {remote}", local.display()))
    }
}

impl ServiceManager for StubRemote {
    async fn install_unit_file(&self, local_dir: &Path, unit: &str) -> Result<()> {
        self.record("install_unit_file", unit)?;
        assert!(
            local_dir.join(unit).is_file(),
            "{unit} must be generated locally before it is installed"
        );
        self.installed.lock().expect("lock").insert(unit.to_string());
        Ok(())
    }

    async fn remove_unit_file(&self, unit: &str) -> Result<()> {
        self.record("remove_unit_file", unit)?;
        self.installed.lock().expect("lock").remove(unit);
        Ok(())
    }

    async fn service_action(&self, action: ServiceAction, unit: &str) -> Result<()> {
        let op = match action {
            ServiceAction::Reload => "reload",
            ServiceAction::Enable => "enable",
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
        };
        self.record(op, unit)
    }

    async fn check_status(&self, unit: &str) -> Result<String> {
        self.record("check_status", unit)?;
        Ok(self.status.clone())
    }

    async fn list_services(&self) -> Result<String> {
        self.record("list_services", "")?;
        Ok(self.listing.clone())
    }
}

// ── RecordingRunner ──────────────────────────────────────────────────────────

/// One captured process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// The last argument; for ssh this is the remote command line.
    pub fn last_arg(&self) -> &str {
        self.args.last().map(String::as_str).unwrap_or_default()
    }
}

/// `CommandRunner` that records invocations and replays queued outputs.
/// Clones share state so a test can inspect calls after handing one to `SshHost`.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<Invocation>>>,
    responses: Arc<Mutex<VecDeque<Output>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Responses are consumed in order; once exhausted every call succeeds
    /// with empty output.
    pub fn with_responses(responses: Vec<Output>) -> Self {
        let runner = Self::default();
        runner.responses.lock().expect("lock").extend(responses);
        runner
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, program: &str, args: &[&str], timeout: Option<Duration>) -> Output {
        self.calls.lock().expect("lock").push(Invocation {
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            timeout,
        });
        self.responses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| ok_output(b""))
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        Ok(self.record(program, args, None))
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        Ok(self.record(program, args, Some(timeout)))
    }
}
