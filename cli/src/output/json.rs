//! JSON output helpers.
//!
//! `--json` prints exactly one pretty-printed document on stdout: the report
//! on success, or an error object on failure.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::{ConfigError, InstallReport, PreflightError, StatusReport, StepError};

/// Renders domain reports as JSON documents on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_install_report(&self, report: &InstallReport) -> Result<()> {
        print_pretty(report)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_status(&self, status: &StatusReport) -> Result<()> {
        print_pretty(status)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_unit(&self, path: &std::path::Path, content: &str) -> Result<()> {
        print_pretty(&serde_json::json!({ "path": path, "content": content }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        print_pretty(&serde_json::json!({ "version": version }))
    }
}

fn print_pretty(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{out}");
    Ok(())
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Stable machine-readable code for the root cause of `err`.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<PreflightError>().is_some() {
        "preflight_failed"
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "invalid_config"
    } else if err.downcast_ref::<StepError>().is_some() {
        "step_failed"
    } else {
        "error"
    }
}
