//! Service unit reconciliation.
//!
//! The unit is compared by content hash and rewritten only on mismatch, so
//! a re-run with an unchanged template leaves the file byte-identical and a
//! changed template is picked up without manual removal.

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ProgressReporter};
use crate::domain::digest::sha256_hex;
use crate::domain::{Account, ArtifactState, InstallLayout, Step, StepOutcome, StepRecord, UnitSpec};

pub const UNIT_FILE_MODE: u32 = 0o644;

/// Desired unit content for this layout and account.
#[must_use]
pub fn desired_unit(layout: &InstallLayout, account: &Account) -> String {
    UnitSpec::new(layout, account).render()
}

/// Compare the on-disk unit with the desired content.
///
/// # Errors
///
/// Returns an error if the unit file exists but cannot be read.
pub fn unit_state(fs: &impl LocalFs, layout: &InstallLayout, account: &Account) -> Result<ArtifactState> {
    let desired = desired_unit(layout, account);
    Ok(match fs.read_optional(&layout.unit_path)? {
        None => ArtifactState::Missing,
        Some(current) if sha256_hex(&current) == sha256_hex(desired.as_bytes()) => {
            ArtifactState::Current
        }
        Some(_) => ArtifactState::Stale,
    })
}

/// Write the unit if it is missing or stale.
///
/// # Errors
///
/// Returns an error if the unit cannot be read or written.
pub fn reconcile_unit(
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    layout: &InstallLayout,
    account: &Account,
) -> Result<StepRecord> {
    let path = layout.unit_path.display().to_string();
    let outcome = match unit_state(fs, layout, account)? {
        ArtifactState::Current => {
            reporter.success(&format!("unit file up to date ({path})"));
            return Ok(StepRecord::new(Step::UnitFile, StepOutcome::Unchanged).with_detail(path));
        }
        ArtifactState::Missing => StepOutcome::Created,
        ArtifactState::Stale | ArtifactState::Unknown => StepOutcome::Updated,
    };

    reporter.step(&format!("writing unit file {path}..."));
    fs.write_atomic(&layout.unit_path, desired_unit(layout, account).as_bytes(), UNIT_FILE_MODE)
        .with_context(|| format!("writing unit file {path}"))?;
    reporter.success(&format!("unit file {}", outcome.as_str()));
    Ok(StepRecord::new(Step::UnitFile, outcome).with_detail(path))
}
