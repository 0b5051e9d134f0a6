//! Infrastructure implementation of the host tooling port traits.
//!
//! `SystemProvisioner<R>` routes `apt-get`, virtual-environment, and
//! `systemctl` calls through a `CommandRunner`. Service-manager calls use
//! the short `cmd_runner`; downloads and builds use `install_runner`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, PackageManager, PythonTooling, ServiceManager};
use crate::domain::Account;
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};

/// Infrastructure adapter for the host's package manager, Python tooling,
/// and service manager.
///
/// Generic over `R: CommandRunner` so that tests can inject a recording
/// runner without spawning real processes.
pub struct SystemProvisioner<R: CommandRunner> {
    cmd_runner: R,
    install_runner: R,
}

impl<R: CommandRunner> SystemProvisioner<R> {
    pub fn new(cmd_runner: R, install_runner: R) -> Self {
        Self {
            cmd_runner,
            install_runner,
        }
    }

    /// Run `program args` as `account`.
    ///
    /// Non-root accounts go through `sudo -u <name> -H` so files created in
    /// the bot directory are owned by the account and `HOME` points at its
    /// home (pip cache, user config).
    async fn run_as(&self, account: &Account, program: &str, args: &[&str]) -> Result<Output> {
        if account.is_root() {
            return self.install_runner.run(program, args).await;
        }
        let mut argv = vec!["-u", account.name.as_str(), "-H", "--", program];
        argv.extend_from_slice(args);
        self.install_runner.run("sudo", &argv).await
    }
}

impl SystemProvisioner<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(install_timeout: Duration) -> Self {
        Self {
            cmd_runner: TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT),
            install_runner: TokioCommandRunner::new(install_timeout),
        }
    }
}

impl<R: CommandRunner> PackageManager for SystemProvisioner<R> {
    async fn update_index(&self) -> Result<Output> {
        self.install_runner
            .run("env", &["DEBIAN_FRONTEND=noninteractive", "apt-get", "update"])
            .await
            .context("apt-get update")
    }

    async fn install(&self, packages: &[&str]) -> Result<Output> {
        let mut args = vec!["DEBIAN_FRONTEND=noninteractive", "apt-get", "install", "-y"];
        args.extend_from_slice(packages);
        self.install_runner
            .run("env", &args)
            .await
            .context("apt-get install")
    }
}

impl<R: CommandRunner> PythonTooling for SystemProvisioner<R> {
    async fn create_venv(&self, account: &Account, python: &str, dir: &Path) -> Result<Output> {
        let dir = dir.to_string_lossy();
        self.run_as(account, python, &["-m", "venv", &dir])
            .await
            .with_context(|| format!("{python} -m venv"))
    }

    async fn pip(&self, account: &Account, pip: &Path, args: &[&str]) -> Result<Output> {
        let pip = pip.to_string_lossy();
        let mut argv = vec!["--disable-pip-version-check"];
        argv.extend_from_slice(args);
        self.run_as(account, &pip, &argv)
            .await
            .with_context(|| format!("{pip} {}", args.first().copied().unwrap_or_default()))
    }

    async fn run_inline(&self, account: &Account, python: &Path, code: &str) -> Result<Output> {
        let python = python.to_string_lossy();
        self.run_as(account, &python, &["-c", code])
            .await
            .with_context(|| format!("{python} -c"))
    }

    async fn run_tool(&self, account: &Account, tool: &Path, args: &[&str]) -> Result<Output> {
        let tool = tool.to_string_lossy();
        self.run_as(account, &tool, args)
            .await
            .with_context(|| tool.to_string())
    }
}

impl<R: CommandRunner> ServiceManager for SystemProvisioner<R> {
    async fn daemon_reload(&self) -> Result<Output> {
        self.cmd_runner
            .run("systemctl", &["daemon-reload"])
            .await
            .context("systemctl daemon-reload")
    }

    async fn enable_now(&self, unit: &str) -> Result<Output> {
        self.cmd_runner
            .run("systemctl", &["enable", "--now", unit])
            .await
            .context("systemctl enable")
    }

    async fn restart(&self, unit: &str) -> Result<Output> {
        self.cmd_runner
            .run("systemctl", &["restart", unit])
            .await
            .context("systemctl restart")
    }

    async fn is_active(&self, unit: &str) -> Result<Output> {
        self.cmd_runner
            .run("systemctl", &["is-active", unit])
            .await
            .context("systemctl is-active")
    }
}
