//! Service activation and the single post-start status poll.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, ServiceManager};
use crate::application::services::ensure_success;
use crate::domain::{ActivationStatus, Step, StepOutcome, StepRecord};

/// Reload unit definitions, enable + start the unit, restart it when its
/// definition changed on this run, then poll `is-active` once after
/// `poll_delay`.
///
/// A unit that is not yet active is reported as a warning, not an error:
/// slow starters are expected to show up as `activating`.
///
/// # Errors
///
/// Returns an error if any `systemctl` control verb fails.
pub async fn activate(
    sm: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    unit: &str,
    restart: bool,
    poll_delay: Duration,
) -> Result<(StepRecord, ActivationStatus)> {
    reporter.step("reloading systemd units...");
    let output = sm.daemon_reload().await.context("systemctl daemon-reload")?;
    ensure_success(&output, "daemon reload", "systemctl")?;

    reporter.step(&format!("enabling and starting {unit}..."));
    let output = sm.enable_now(unit).await.context("systemctl enable --now")?;
    ensure_success(&output, "service enable", "systemctl")?;

    if restart {
        reporter.step(&format!("restarting {unit} to apply the updated unit..."));
        let output = sm.restart(unit).await.context("systemctl restart")?;
        ensure_success(&output, "service restart", "systemctl")?;
    }

    tokio::time::sleep(poll_delay).await;
    let status = poll_status(sm, unit).await?;
    if status.active {
        reporter.success(&format!("{unit} is active"));
    } else {
        reporter.warn(&format!(
            "{unit} is {} (it may still be starting). Check: journalctl -u {unit}",
            status.state
        ));
    }

    let record = StepRecord::new(Step::Activation, StepOutcome::Done).with_detail(status.state.clone());
    Ok((record, status))
}

/// Query the unit state once.
///
/// # Errors
///
/// Returns an error only if `systemctl` cannot be run at all.
pub async fn poll_status(sm: &impl ServiceManager, unit: &str) -> Result<ActivationStatus> {
    let output = sm.is_active(unit).await.context("systemctl is-active")?;
    let state = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let state = if state.is_empty() { "unknown".to_string() } else { state };
    Ok(ActivationStatus {
        active: output.status.success() && state == "active",
        state,
    })
}
