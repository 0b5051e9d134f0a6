//! Dependency installation inside the virtual environment.
//!
//! Order is fixed: installer tooling, optional manifest generation, the
//! manifest, then the critical packages. Critical packages are installed
//! last and unpinned, so they end up at the latest available version even
//! when the manifest pins an older one.

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ProgressReporter, PythonTooling};
use crate::application::services::ensure_success;
use crate::domain::{Account, InstallLayout, Step, StepOutcome, StepRecord};

/// Packages upgraded before anything else is installed.
pub const TOOLING_PACKAGES: &[&str] = &["pip", "setuptools", "wheel"];

/// External scanner used to produce a manifest from the bot's imports.
pub const MANIFEST_SCANNER: &str = "pipreqs";

/// Dependency-installer settings taken from configuration.
pub struct DependencyPlan<'a> {
    pub critical: &'a [String],
    pub generate_manifest: bool,
}

/// Run all dependency steps and return one record per step.
///
/// # Errors
///
/// Returns an error on the first failing pip invocation.
pub async fn install_dependencies(
    tooling: &impl PythonTooling,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    layout: &InstallLayout,
    account: &Account,
    plan: &DependencyPlan<'_>,
) -> Result<Vec<StepRecord>> {
    let pip = layout.venv_pip();
    let pip_name = pip.display().to_string();
    let mut records = Vec::with_capacity(4);

    reporter.step("upgrading installer tooling...");
    let mut args = vec!["install", "--upgrade"];
    args.extend_from_slice(TOOLING_PACKAGES);
    let output = tooling
        .pip(account, &pip, &args)
        .await
        .context("upgrading installer tooling")?;
    ensure_success(&output, "tooling upgrade", &pip_name)?;
    records.push(StepRecord::new(Step::ToolingUpgrade, StepOutcome::Done));

    if plan.generate_manifest && !fs.exists(&layout.manifest) {
        records.push(generate_manifest(tooling, reporter, layout, account).await?);
    }

    let manifest = layout.manifest.display().to_string();
    if fs.exists(&layout.manifest) {
        reporter.step(&format!("installing from {manifest}..."));
        let output = tooling
            .pip(account, &pip, &["install", "-r", &manifest])
            .await
            .context("installing manifest dependencies")?;
        ensure_success(&output, "manifest install", &pip_name)?;
        records.push(StepRecord::new(Step::Manifest, StepOutcome::Done).with_detail(manifest));
    } else {
        reporter.warn(&format!("no manifest at {manifest}, continuing with critical packages"));
        records.push(StepRecord::new(Step::Manifest, StepOutcome::Skipped).with_detail(manifest));
    }

    if plan.critical.is_empty() {
        records.push(StepRecord::new(Step::CriticalPackages, StepOutcome::Skipped));
    } else {
        let names: Vec<&str> = plan.critical.iter().map(String::as_str).collect();
        reporter.step(&format!("installing critical packages: {}...", names.join(" ")));
        let mut args = vec!["install", "--upgrade"];
        args.extend_from_slice(&names);
        let output = tooling
            .pip(account, &pip, &args)
            .await
            .context("installing critical packages")?;
        ensure_success(&output, "critical package install", &pip_name)?;
        records.push(
            StepRecord::new(Step::CriticalPackages, StepOutcome::Done).with_detail(names.join(", ")),
        );
    }

    reporter.success("dependencies installed");
    Ok(records)
}

/// Install the scanner into the environment and write the manifest with it.
async fn generate_manifest(
    tooling: &impl PythonTooling,
    reporter: &impl ProgressReporter,
    layout: &InstallLayout,
    account: &Account,
) -> Result<StepRecord> {
    let pip = layout.venv_pip();
    reporter.step(&format!("generating manifest with {MANIFEST_SCANNER}..."));
    let output = tooling
        .pip(account, &pip, &["install", "--upgrade", MANIFEST_SCANNER])
        .await
        .context("installing manifest scanner")?;
    ensure_success(&output, "manifest scanner install", &pip.display().to_string())?;

    let scanner = layout.venv_dir.join("bin").join(MANIFEST_SCANNER);
    let manifest = layout.manifest.display().to_string();
    let venv = layout.venv_dir.display().to_string();
    let bot_dir = layout.bot_dir.display().to_string();
    let output = tooling
        .run_tool(
            account,
            &scanner,
            &["--savepath", &manifest, "--ignore", &venv, &bot_dir],
        )
        .await
        .context("generating manifest")?;
    ensure_success(&output, "manifest generation", MANIFEST_SCANNER)?;
    Ok(StepRecord::new(Step::ManifestGeneration, StepOutcome::Created).with_detail(manifest))
}
