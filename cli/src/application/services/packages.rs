//! OS package provisioning.

use anyhow::{Context, Result};

use crate::application::ports::{PackageManager, ProgressReporter};
use crate::application::services::ensure_success;
use crate::domain::{Step, StepOutcome, StepRecord};

/// Refresh the package index, then install `packages`.
///
/// # Errors
///
/// Returns an error if either package manager invocation fails. Not retried.
pub async fn ensure_packages(
    pm: &impl PackageManager,
    reporter: &impl ProgressReporter,
    packages: &[String],
) -> Result<StepRecord> {
    reporter.step("refreshing package index...");
    let output = pm.update_index().await.context("refreshing package index")?;
    ensure_success(&output, "package index update", "apt-get")?;

    let names: Vec<&str> = packages.iter().map(String::as_str).collect();
    reporter.step(&format!("installing {}...", names.join(" ")));
    let output = pm.install(&names).await.context("installing OS packages")?;
    ensure_success(&output, "package install", "apt-get")?;

    reporter.success("OS packages present");
    Ok(StepRecord::new(Step::Packages, StepOutcome::Done).with_detail(names.join(", ")))
}
