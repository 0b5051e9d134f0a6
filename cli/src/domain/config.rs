//! Domain types and validators for installer configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_SERVICE_NAME: &str = "nearbot";
pub const DEFAULT_DESCRIPTION: &str = "NEAR validator Telegram bot";
pub const DEFAULT_OS_PACKAGES: &[&str] = &["python3", "python3-venv", "python3-pip", "ca-certificates"];
pub const DEFAULT_CRITICAL_PACKAGES: &[&str] = &["pyTelegramBotAPI", "py-near", "psutil"];
pub const DEFAULT_PROBE_MODULE: &str = "telebot";
/// Python module the NEAR bot imports its settings from (`import env`).
pub const DEFAULT_CONFIG_MODULE: &str = "env.py";
/// Default timeout for package and pip commands.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 1800;

static SERVICE_NAME_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]{0,62}$").ok());
static ENV_KEY_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok());
static PROBE_MODULE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").ok());

// ── Config schema ────────────────────────────────────────────────────────────

/// Installer configuration, optionally loaded from `/etc/nearbot-provision.yaml`.
///
/// Every field has a default so a missing file behaves like the fixed
/// constants of a plain install.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// systemd unit name without the `.service` suffix.
    pub service_name: String,
    /// `Description=` line of the unit.
    pub description: String,
    /// Directory holding the bot. Relative paths resolve against the cwd.
    pub bot_dir: PathBuf,
    /// Entry file name inside `bot_dir`.
    pub entry_file: String,
    /// Virtual environment directory name inside `bot_dir`.
    pub venv_dir: String,
    /// Dependency manifest name inside `bot_dir`.
    pub manifest: String,
    /// Settings module inside `bot_dir` the bot imports at startup
    /// (`BotAPIKey`, `POOL_NAME`, `NEAR_NETWORK`). `null` skips the check for
    /// bots configured through the process environment instead.
    pub config_module: Option<String>,
    /// Directory the unit file is written to.
    pub unit_dir: PathBuf,
    /// `EnvironmentFile=` path. Defaults to `/etc/default/<service_name>`.
    pub env_file: Option<PathBuf>,
    /// Target user. Falls back to `SUDO_USER`, then `USER`.
    pub user: Option<String>,
    /// System interpreter used to create the environment.
    pub python: String,
    pub os_packages: Vec<String>,
    /// Always installed with `--upgrade` after the manifest.
    pub critical_packages: Vec<String>,
    /// Module imported by the sanity probe.
    pub probe_module: String,
    /// Run `pipreqs` to produce the manifest when it is missing.
    pub generate_manifest: bool,
    /// `KEY=VALUE` pairs written to a freshly created environment file.
    ///
    /// Only reaches bots that read the process environment. The NEAR bot
    /// takes its settings from `config_module`.
    pub environment: BTreeMap<String, String>,
    pub restart_sec: u32,
    /// Timeout for package and pip commands.
    pub command_timeout_secs: u64,
    /// Delay before the single post-start `is-active` poll.
    pub status_poll_delay_ms: u64,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            bot_dir: PathBuf::from("."),
            entry_file: "bot.py".to_string(),
            venv_dir: "venv".to_string(),
            manifest: "requirements.txt".to_string(),
            config_module: Some(DEFAULT_CONFIG_MODULE.to_string()),
            unit_dir: PathBuf::from("/etc/systemd/system"),
            env_file: None,
            user: None,
            python: "python3".to_string(),
            os_packages: to_strings(DEFAULT_OS_PACKAGES),
            critical_packages: to_strings(DEFAULT_CRITICAL_PACKAGES),
            probe_module: DEFAULT_PROBE_MODULE.to_string(),
            generate_manifest: false,
            environment: default_environment(),
            restart_sec: 5,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            status_poll_delay_ms: 1000,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Unbuffered stdout so bot output reaches the journal line by line.
fn default_environment() -> BTreeMap<String, String> {
    BTreeMap::from([("PYTHONUNBUFFERED".to_string(), "1".to_string())])
}

impl InstallerConfig {
    /// Resolved environment file path.
    #[must_use]
    pub fn env_file_path(&self) -> PathBuf {
        self.env_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("/etc/default").join(&self.service_name))
    }

    /// Validate every field that ends up in a rendered artifact.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<()> {
        validate_service_name(&self.service_name)?;
        validate_unit_value("description", &self.description)?;
        if let Some(user) = &self.user {
            validate_unit_value("user", user)?;
        }
        if let Some(module) = &self.config_module {
            validate_file_name("config_module", module)?;
        }
        for (key, value) in &self.environment {
            validate_env_entry(key, value)?;
        }
        if self.os_packages.is_empty() {
            return Err(ConfigError::EmptyPackageList("os_packages").into());
        }
        if !matches(&PROBE_MODULE_RE, &self.probe_module) {
            return Err(ConfigError::InvalidProbeModule(self.probe_module.clone()).into());
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

fn matches(re: &LazyLock<Option<Regex>>, value: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(value))
}

/// Validates a systemd service name.
///
/// # Errors
///
/// Returns an error if the name is empty, too long, or has invalid characters.
pub fn validate_service_name(name: &str) -> Result<()> {
    if !matches(&SERVICE_NAME_RE, name) {
        return Err(ConfigError::InvalidServiceName(name.to_string()).into());
    }
    Ok(())
}

/// Validates a value substituted into a single unit file line.
///
/// # Errors
///
/// Returns an error if the value contains a newline or any other control
/// character.
pub fn validate_unit_value(field: &'static str, value: &str) -> Result<()> {
    if value.chars().any(char::is_control) {
        return Err(ConfigError::ControlCharacter(field).into());
    }
    Ok(())
}

/// Validates a plain file name joined onto `bot_dir`.
fn validate_file_name(field: &'static str, name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(ConfigError::InvalidFileName(field, name.to_string()).into());
    }
    validate_unit_value(field, name)
}

/// Validates one `KEY=VALUE` environment entry.
///
/// # Errors
///
/// Returns an error if the key is not a shell-style identifier or the value
/// spans multiple lines.
pub fn validate_env_entry(key: &str, value: &str) -> Result<()> {
    if !matches(&ENV_KEY_RE, key) {
        return Err(ConfigError::InvalidEnvKey(key.to_string()).into());
    }
    if value.contains('\n') || value.contains('\r') {
        return Err(ConfigError::MultilineEnvValue(key.to_string()).into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
