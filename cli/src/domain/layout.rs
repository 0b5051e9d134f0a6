//! Resolved install layout: every path and identity the workflow touches.
//!
//! Resolved once at start and never mutated afterwards.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::config::InstallerConfig;

/// A passwd account the bot runs as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: PathBuf,
    /// Login shell from passwd, used when `SHELL` is unset.
    pub shell: PathBuf,
}

impl Account {
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.uid == 0
    }
}

/// Snapshot of the invoking process environment relevant to the workflow.
///
/// Captured once by the command layer so services stay free of `std::env`.
#[derive(Debug, Clone, Default)]
pub struct InvokerEnv {
    pub sudo_user: Option<String>,
    pub user: Option<String>,
    pub shell: Option<String>,
}

impl InvokerEnv {
    /// Capture from the current process environment.
    #[must_use]
    pub fn capture() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            sudo_user: non_empty("SUDO_USER"),
            user: non_empty("USER"),
            shell: non_empty("SHELL"),
        }
    }

    /// Pick the target user name: explicit override, then `SUDO_USER`
    /// (unless it is `root`), then `USER`.
    #[must_use]
    pub fn target_user<'a>(&'a self, configured: Option<&'a str>) -> Option<&'a str> {
        configured
            .or_else(|| self.sudo_user.as_deref().filter(|u| *u != "root"))
            .or(self.user.as_deref())
    }
}

/// All filesystem locations used by the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallLayout {
    pub service_name: String,
    pub description: String,
    pub bot_dir: PathBuf,
    pub entry: PathBuf,
    pub venv_dir: PathBuf,
    pub manifest: PathBuf,
    /// Settings module the bot imports, when one is expected.
    pub config_module: Option<PathBuf>,
    pub unit_path: PathBuf,
    pub env_path: PathBuf,
    /// System interpreter used to create the environment.
    pub python: String,
    pub restart_sec: u32,
}

impl InstallLayout {
    /// Resolve paths from configuration. Relative `bot_dir` is joined to `cwd`.
    #[must_use]
    pub fn resolve(config: &InstallerConfig, cwd: &Path) -> Self {
        let bot_dir = if config.bot_dir.is_absolute() {
            config.bot_dir.clone()
        } else {
            normalize(&cwd.join(&config.bot_dir))
        };
        Self {
            service_name: config.service_name.clone(),
            description: config.description.clone(),
            entry: bot_dir.join(&config.entry_file),
            venv_dir: bot_dir.join(&config.venv_dir),
            manifest: bot_dir.join(&config.manifest),
            config_module: config.config_module.as_ref().map(|m| bot_dir.join(m)),
            unit_path: config
                .unit_dir
                .join(format!("{}.service", config.service_name)),
            env_path: config.env_file_path(),
            python: config.python.clone(),
            restart_sec: config.restart_sec,
            bot_dir,
        }
    }

    /// Interpreter inside the virtual environment.
    #[must_use]
    pub fn venv_python(&self) -> PathBuf {
        self.venv_dir.join("bin").join("python")
    }

    /// Package installer inside the virtual environment.
    #[must_use]
    pub fn venv_pip(&self) -> PathBuf {
        self.venv_dir.join("bin").join("pip")
    }

    /// Unit name as passed to `systemctl`.
    #[must_use]
    pub fn unit_name(&self) -> String {
        format!("{}.service", self.service_name)
    }
}

/// Drop `.` components so `./` defaults render cleanly in the unit file.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}
