//! Environment sanity probe.

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, PythonTooling};
use crate::application::services::ensure_success;
use crate::domain::report::{parse_probe_output, probe_script};
use crate::domain::{Account, InstallLayout, ProbeResult, Step, StepOutcome, StepRecord};

/// Import `module` inside the environment and report its version and the
/// interpreter path. Any failure aborts the workflow.
///
/// # Errors
///
/// Returns an error if the import fails or the probe output is malformed.
pub async fn sanity_check(
    tooling: &impl PythonTooling,
    reporter: &impl ProgressReporter,
    layout: &InstallLayout,
    account: &Account,
    module: &str,
) -> Result<(StepRecord, ProbeResult)> {
    let python = layout.venv_python();
    reporter.step(&format!("checking that {module} imports..."));
    let output = tooling
        .run_inline(account, &python, &probe_script(module))
        .await
        .context("running sanity probe")?;
    ensure_success(&output, "sanity check", &python.display().to_string())?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let probe = parse_probe_output(&stdout)
        .with_context(|| format!("sanity probe printed unexpected output: {stdout:?}"))?;

    reporter.success(&format!(
        "{module} {} importable ({})",
        probe.module_version, probe.interpreter
    ));
    let record = StepRecord::new(Step::SanityCheck, StepOutcome::Done)
        .with_detail(format!("{module} {}", probe.module_version));
    Ok((record, probe))
}
