//! Shared test helpers: output constructors and account fixtures.

#![allow(dead_code)]

use std::path::Path;
use std::process::{ExitStatus, Output};

use nearbot_provision::domain::{Account, InstallerConfig, InvokerEnv};

// ── ExitStatus construction ──────────────────────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// The raw wait-status encodes the exit code in bits 8–15, so we shift.
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// A non-root account with the given home.
pub fn account_with_home(name: &str, home: &Path) -> Account {
    Account {
        name: name.to_string(),
        uid: 1000,
        gid: 1000,
        home: home.to_path_buf(),
        shell: "/bin/bash".into(),
    }
}

/// The account running the tests, so `chown` to it succeeds unprivileged.
pub fn current_account(home: &Path) -> Account {
    Account {
        name: "botops".to_string(),
        uid: nix::unistd::getuid().as_raw(),
        gid: nix::unistd::getgid().as_raw(),
        home: home.to_path_buf(),
        shell: "/bin/bash".into(),
    }
}

pub fn sudo_env(user: &str) -> InvokerEnv {
    InvokerEnv {
        sudo_user: Some(user.to_string()),
        user: Some("root".to_string()),
        shell: Some("/bin/bash".to_string()),
    }
}

/// Config whose every host path lives under `root`.
pub fn sandboxed_config(root: &Path) -> InstallerConfig {
    InstallerConfig {
        bot_dir: root.join("bot"),
        unit_dir: root.join("systemd"),
        env_file: Some(root.join("default").join("nearbot")),
        status_poll_delay_ms: 0,
        ..InstallerConfig::default()
    }
}
