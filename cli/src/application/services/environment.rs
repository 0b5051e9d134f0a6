//! Virtual environment creation.

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ProgressReporter, PythonTooling};
use crate::application::services::ensure_success;
use crate::domain::{Account, InstallLayout, Step, StepOutcome, StepRecord};

/// Create the environment as `account` unless the directory already exists.
///
/// Existence is the only check; a broken environment is not detected here
/// (the sanity check catches that later).
///
/// # Errors
///
/// Returns an error if the environment tool fails.
pub async fn ensure_environment(
    tooling: &impl PythonTooling,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    layout: &InstallLayout,
    account: &Account,
) -> Result<StepRecord> {
    let dir = layout.venv_dir.display().to_string();
    if fs.exists(&layout.venv_dir) {
        reporter.success(&format!("virtual environment already present at {dir}"));
        return Ok(StepRecord::new(Step::Environment, StepOutcome::Unchanged).with_detail(dir));
    }

    reporter.step(&format!("creating virtual environment at {dir} as {}...", account.name));
    let output = tooling
        .create_venv(account, &layout.python, &layout.venv_dir)
        .await
        .context("creating virtual environment")?;
    ensure_success(&output, "environment creation", &layout.python)?;

    reporter.success("virtual environment created");
    Ok(StepRecord::new(Step::Environment, StepOutcome::Created).with_detail(dir))
}
