//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{Account, InstallerConfig};

// ── Host Tooling Port Traits ──────────────────────────────────────────────────

/// System package manager operations.
#[allow(async_fn_in_trait)]
pub trait PackageManager {
    /// Refresh the package index.
    async fn update_index(&self) -> Result<Output>;
    /// Install packages non-interactively.
    async fn install(&self, packages: &[&str]) -> Result<Output>;
}

/// Virtual environment and package-installer operations.
///
/// Every call that writes into the environment runs as `account`, never as
/// the elevated installer identity.
#[allow(async_fn_in_trait)]
pub trait PythonTooling {
    /// Create a virtual environment at `dir` with the system `python`.
    async fn create_venv(&self, account: &Account, python: &str, dir: &Path) -> Result<Output>;
    /// Run the environment's `pip` with `args`.
    async fn pip(&self, account: &Account, pip: &Path, args: &[&str]) -> Result<Output>;
    /// Run an inline program with the given interpreter.
    async fn run_inline(&self, account: &Account, python: &Path, code: &str) -> Result<Output>;
    /// Run an executable installed in the environment (e.g. `pipreqs`).
    async fn run_tool(&self, account: &Account, tool: &Path, args: &[&str]) -> Result<Output>;
}

/// Service manager control verbs.
#[allow(async_fn_in_trait)]
pub trait ServiceManager {
    /// Reload unit definitions from disk.
    async fn daemon_reload(&self) -> Result<Output>;
    /// Enable the unit and start it in one step.
    async fn enable_now(&self, unit: &str) -> Result<Output>;
    async fn restart(&self, unit: &str) -> Result<Output>;
    /// Query the unit state. Non-zero exit means "not active", not an error.
    async fn is_active(&self, unit: &str) -> Result<Output>;
}

/// Composite trait: any type implementing all three sub-traits is a `HostProvisioner`.
pub trait HostProvisioner: PackageManager + PythonTooling + ServiceManager {}

/// Blanket implementation: any type implementing all three sub-traits is a `HostProvisioner`.
impl<T> HostProvisioner for T where T: PackageManager + PythonTooling + ServiceManager {}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Host Identity Port ────────────────────────────────────────────────────────

/// Privilege and passwd lookups.
pub trait HostIdentity {
    /// `true` when the effective uid is 0.
    fn is_elevated(&self) -> bool;
    /// Look up an account by name. `Ok(None)` if it does not exist.
    fn lookup_user(&self, name: &str) -> Result<Option<Account>>;
    /// Account of the effective uid.
    fn current_account(&self) -> Result<Option<Account>>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Where a path leads once every symlink on it is followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    /// Owner uid of the file at `path`, `None` when nothing exists there yet.
    pub owner: Option<u32>,
}

/// Abstracts local filesystem access for artifact reconciliation.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    /// Read a file as raw bytes, returning `None` if it does not exist.
    fn read_optional(&self, path: &Path) -> Result<Option<Vec<u8>>>;
    /// Replace `path` atomically with `content`.
    ///
    /// `mode` applies to newly created files; an existing file keeps its
    /// permissions.
    fn write_atomic(&self, path: &Path, content: &[u8], mode: u32) -> Result<()>;
    /// Change ownership of `path` itself, never of a symlink target.
    fn chown(&self, path: &Path, uid: u32, gid: u32) -> Result<()>;
    /// Follow symlinks on `path`, including a dangling final link.
    fn resolve(&self, path: &Path) -> Result<ResolvedPath>;
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts installer configuration persistence.
pub trait ConfigStore {
    /// Load configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<InstallerConfig>;
    /// Path the configuration is read from.
    fn path(&self) -> PathBuf;
}
