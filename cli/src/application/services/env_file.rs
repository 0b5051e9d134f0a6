//! Environment file for `EnvironmentFile=`.
//!
//! Create-if-absent only: operators add their own process environment
//! settings here, so an existing file is never rewritten.

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ProgressReporter};
use crate::domain::{InstallLayout, Step, StepOutcome, StepRecord, env_file};

pub const ENV_FILE_MODE: u32 = 0o600;

/// Write the environment file if it does not exist yet.
///
/// # Errors
///
/// Returns an error if an entry is invalid or the file cannot be written.
pub fn ensure_env_file(
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    layout: &InstallLayout,
    environment: &BTreeMap<String, String>,
) -> Result<StepRecord> {
    let path = layout.env_path.display().to_string();
    if fs.exists(&layout.env_path) {
        reporter.success(&format!("environment file kept ({path})"));
        return Ok(StepRecord::new(Step::EnvFile, StepOutcome::Unchanged).with_detail(path));
    }

    let body = env_file::render(environment)?;
    fs.write_atomic(&layout.env_path, body.as_bytes(), ENV_FILE_MODE)
        .with_context(|| format!("writing environment file {path}"))?;
    reporter.success(&format!("environment file created ({path})"));
    Ok(StepRecord::new(Step::EnvFile, StepOutcome::Created).with_detail(path))
}
