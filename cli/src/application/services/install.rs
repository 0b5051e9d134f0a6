//! Full install workflow.
//!
//! Steps run strictly in order and the first failure aborts the run. Every
//! step is idempotent, so re-running after fixing the cause converges.

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;

use crate::application::ports::{HostProvisioner, LocalFs, ProgressReporter};
use crate::application::services::activation::activate;
use crate::application::services::dependencies::{DependencyPlan, install_dependencies};
use crate::application::services::env_file::ensure_env_file;
use crate::application::services::environment::ensure_environment;
use crate::application::services::packages::ensure_packages;
use crate::application::services::preflight::Resolved;
use crate::application::services::sanity::sanity_check;
use crate::application::services::shell_integration::integrate_shell;
use crate::application::services::unit_file::reconcile_unit;
use crate::domain::{InstallReport, InstallerConfig, StepOutcome};

/// Provision the host for an already-resolved account and layout.
///
/// # Errors
///
/// Returns the error of the first failing step.
pub async fn provision(
    provisioner: &impl HostProvisioner,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    resolved: &Resolved,
    config: &InstallerConfig,
    shell_env: Option<&str>,
) -> Result<InstallReport> {
    let Resolved { account, layout } = resolved;
    let mut report = InstallReport {
        service: layout.service_name.clone(),
        user: account.name.clone(),
        unit_path: layout.unit_path.clone(),
        started_at: Utc::now(),
        steps: Vec::new(),
        probe: None,
        activation: None,
    };

    report
        .steps
        .push(ensure_packages(provisioner, reporter, &config.os_packages).await?);
    report
        .steps
        .push(ensure_environment(provisioner, fs, reporter, layout, account).await?);

    let plan = DependencyPlan {
        critical: &config.critical_packages,
        generate_manifest: config.generate_manifest,
    };
    report
        .steps
        .extend(install_dependencies(provisioner, fs, reporter, layout, account, &plan).await?);

    let (record, probe) = sanity_check(provisioner, reporter, layout, account, &config.probe_module).await?;
    report.steps.push(record);
    report.probe = Some(probe);

    let unit = reconcile_unit(fs, reporter, layout, account)?;
    let restart = unit.outcome == StepOutcome::Updated;
    report.steps.push(unit);
    report
        .steps
        .push(ensure_env_file(fs, reporter, layout, &config.environment)?);

    let poll_delay = Duration::from_millis(config.status_poll_delay_ms);
    let (record, status) = activate(provisioner, reporter, &layout.unit_name(), restart, poll_delay).await?;
    report.steps.push(record);
    report.activation = Some(status);

    report.steps.push(integrate_shell(
        fs,
        reporter,
        account,
        &layout.service_name,
        shell_env,
    )?);

    Ok(report)
}
