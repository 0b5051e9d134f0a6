//! Shared mock infrastructure for unit tests.
//!
//! Provides a recording [`CommandRunner`], a recording host provisioner, and
//! stub identity/reporter ports so each test file doesn't have to re-define
//! the same boilerplate.

#![allow(clippy::expect_used, dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::process::Output;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, bail};
use nearbot_provision::application::ports::{
    CommandRunner, HostIdentity, PackageManager, ProgressReporter, PythonTooling, ServiceManager,
};
use nearbot_provision::domain::Account;

use crate::helpers::ok_output;

// ── MockCommandRunner ─────────────────────────────────────────────────────────

/// A `CommandRunner` that records every `(program, args)` call and replays
/// queued outputs, falling back to a successful empty output.
///
/// Thread-safe via `Arc<Mutex<…>>` so it can be cloned into two runners
/// (`cmd_runner` + `install_runner`) that share the same call log.
#[derive(Clone, Default)]
pub struct MockCommandRunner {
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    queued: Arc<Mutex<VecDeque<Result<Output, String>>>>,
}

impl MockCommandRunner {
    pub fn push_output(&self, output: Output) {
        self.queued.lock().expect("mutex poisoned").push_back(Ok(output));
    }

    pub fn push_error(&self, msg: &str) {
        self.queued
            .lock()
            .expect("mutex poisoned")
            .push_back(Err(msg.to_string()));
    }

    /// Return a snapshot of all recorded calls.
    pub fn recorded_calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("mutex poisoned").clone()
    }

    /// Each call flattened to one `program arg arg ...` line.
    pub fn command_lines(&self) -> Vec<String> {
        self.recorded_calls()
            .into_iter()
            .map(|(program, args)| {
                std::iter::once(program)
                    .chain(args)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

impl CommandRunner for MockCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.calls.lock().expect("mutex poisoned").push((
            program.to_owned(),
            args.iter().map(|s| (*s).to_string()).collect(),
        ));
        match self.queued.lock().expect("mutex poisoned").pop_front() {
            Some(Ok(output)) => Ok(output),
            Some(Err(msg)) => bail!("{msg}"),
            None => Ok(ok_output(b"")),
        }
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Output> {
        self.run(program, args).await
    }
}

// ── RecordingHost ─────────────────────────────────────────────────────────────

/// Host provisioner that records port calls by name and succeeds, except
/// where a failure has been scripted with [`RecordingHost::fail_on`].
#[derive(Default)]
pub struct RecordingHost {
    pub calls: RefCell<Vec<String>>,
    failures: RefCell<Vec<(String, Output)>>,
}

impl RecordingHost {
    /// Fail the first call whose recorded line starts with `prefix`.
    pub fn fail_on(&self, prefix: &str, output: Output) {
        self.failures.borrow_mut().push((prefix.to_string(), output));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String, default: Output) -> Output {
        let mut failures = self.failures.borrow_mut();
        let scripted = failures
            .iter()
            .position(|(prefix, _)| call.starts_with(prefix.as_str()))
            .map(|i| failures.remove(i).1);
        self.calls.borrow_mut().push(call);
        scripted.unwrap_or(default)
    }
}

impl PackageManager for RecordingHost {
    async fn update_index(&self) -> Result<Output> {
        Ok(self.record("apt-get update".into(), ok_output(b"")))
    }
    async fn install(&self, packages: &[&str]) -> Result<Output> {
        Ok(self.record(format!("apt-get install {}", packages.join(" ")), ok_output(b"")))
    }
}

impl PythonTooling for RecordingHost {
    async fn create_venv(&self, _: &Account, python: &str, dir: &Path) -> Result<Output> {
        std::fs::create_dir_all(dir.join("bin")).expect("create venv dir");
        Ok(self.record(format!("{python} -m venv {}", dir.display()), ok_output(b"")))
    }
    async fn pip(&self, _: &Account, _: &Path, args: &[&str]) -> Result<Output> {
        Ok(self.record(format!("pip {}", args.join(" ")), ok_output(b"")))
    }
    async fn run_inline(&self, _: &Account, python: &Path, _: &str) -> Result<Output> {
        let stdout = format!("4.14.0\n{}\n", python.display());
        Ok(self.record("python -c probe".into(), ok_output(stdout.as_bytes())))
    }
    async fn run_tool(&self, _: &Account, tool: &Path, args: &[&str]) -> Result<Output> {
        Ok(self.record(format!("{} {}", tool.display(), args.join(" ")), ok_output(b"")))
    }
}

impl ServiceManager for RecordingHost {
    async fn daemon_reload(&self) -> Result<Output> {
        Ok(self.record("systemctl daemon-reload".into(), ok_output(b"")))
    }
    async fn enable_now(&self, unit: &str) -> Result<Output> {
        Ok(self.record(format!("systemctl enable --now {unit}"), ok_output(b"")))
    }
    async fn restart(&self, unit: &str) -> Result<Output> {
        Ok(self.record(format!("systemctl restart {unit}"), ok_output(b"")))
    }
    async fn is_active(&self, unit: &str) -> Result<Output> {
        Ok(self.record(format!("systemctl is-active {unit}"), ok_output(b"active\n")))
    }
}

// ── Identity and reporter stubs ───────────────────────────────────────────────

pub struct StubIdentity {
    pub elevated: bool,
    pub accounts: Vec<Account>,
}

impl HostIdentity for StubIdentity {
    fn is_elevated(&self) -> bool {
        self.elevated
    }
    fn lookup_user(&self, name: &str) -> Result<Option<Account>> {
        Ok(self.accounts.iter().find(|a| a.name == name).cloned())
    }
    fn current_account(&self) -> Result<Option<Account>> {
        Ok(None)
    }
}

#[derive(Default)]
pub struct CollectingReporter {
    pub lines: RefCell<Vec<String>>,
}

impl CollectingReporter {
    pub fn warnings(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter_map(|l| l.strip_prefix("! ").map(str::to_string))
            .collect()
    }
}

impl ProgressReporter for CollectingReporter {
    fn step(&self, message: &str) {
        self.lines.borrow_mut().push(format!("→ {message}"));
    }
    fn success(&self, message: &str) {
        self.lines.borrow_mut().push(format!("✓ {message}"));
    }
    fn warn(&self, message: &str) {
        self.lines.borrow_mut().push(format!("! {message}"));
    }
}
