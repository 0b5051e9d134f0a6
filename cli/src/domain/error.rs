//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Preflight errors ──────────────────────────────────────────────────────────

/// Operator-fixable precondition failures. Raised before any host mutation.
#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("Cannot determine the target user. Run via sudo or set `user` in the config file.")]
    NoUser,

    #[error("User '{0}' does not exist in the passwd database.")]
    UnknownUser(String),

    #[error("Cannot determine home directory for user '{0}'.")]
    HomeNotFound(String),

    #[error("Elevated privileges required. Re-run with: sudo nearbot-provision")]
    NotElevated,

    #[error("Bot entry file not found: {}", .0.display())]
    EntryMissing(PathBuf),

    #[error(
        "Bot config module not found: {}. Create it with BotAPIKey, AdminChatID and POOL_NAME, \
         or set `config_module: null` if the bot reads its settings elsewhere.",
        .0.display()
    )]
    ConfigModuleMissing(PathBuf),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid service name '{0}': must match ^[a-z0-9][a-z0-9_-]{{0,62}}$")]
    InvalidServiceName(String),

    #[error("Invalid environment key '{0}': must match ^[A-Za-z_][A-Za-z0-9_]*$")]
    InvalidEnvKey(String),

    #[error("Environment value for '{0}' must be a single line")]
    MultilineEnvValue(String),

    #[error("`{0}` must list at least one package")]
    EmptyPackageList(&'static str),

    #[error("Invalid probe module '{0}': must be a dotted Python identifier")]
    InvalidProbeModule(String),

    #[error("`{0}` must not contain newlines or other control characters")]
    ControlCharacter(&'static str),

    #[error("`{0}` must be a plain file name inside bot_dir, got '{1}'")]
    InvalidFileName(&'static str, String),
}

// ── Step errors ───────────────────────────────────────────────────────────────

/// An external command exited unsuccessfully during a provisioning step.
#[derive(Debug, Error)]
#[error("{step} failed: `{program}` exited with {}\n{stderr}", code_display(*.code))]
pub struct StepError {
    pub step: &'static str,
    pub program: String,
    pub code: Option<i32>,
    pub stderr: String,
}

fn code_display(code: Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("code {c}"))
}
