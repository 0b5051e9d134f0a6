//! Operator alias block in the shell rc file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ProgressReporter, ResolvedPath};
use crate::domain::{Account, AliasBlock, ArtifactState, Step, StepOutcome, StepRecord, rc_file_for};

pub const RC_FILE_MODE: u32 = 0o644;

/// rc file for `account`: `SHELL` from the invoking environment, falling back
/// to the passwd login shell.
#[must_use]
pub fn rc_path(account: &Account, shell_env: Option<&str>) -> PathBuf {
    let login_shell = account.shell.display().to_string();
    rc_file_for(&account.home, shell_env.unwrap_or(&login_shell))
}

/// Reconcile the alias block and hand the rc file back to `account`.
///
/// The rc file is edited as raw bytes, so content in any encoding survives.
/// A symlinked rc file is written through only when its target lives under
/// the account's home and already belongs to the account; otherwise the step
/// is skipped with a warning and nothing is written or chowned.
///
/// # Errors
///
/// Returns an error if the rc file cannot be resolved, read, written, or
/// chowned.
pub fn integrate_shell(
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    account: &Account,
    service: &str,
    shell_env: Option<&str>,
) -> Result<StepRecord> {
    let rc = rc_path(account, shell_env);
    let rc_display = rc.display().to_string();

    let home = fs
        .resolve(&account.home)
        .with_context(|| format!("resolving {}", account.home.display()))?;
    let target = fs
        .resolve(&rc)
        .with_context(|| format!("resolving {rc_display}"))?;
    if let Some(reason) = foreign_target(&target, &home.path, account) {
        reporter.warn(&format!(
            "not touching {rc_display}: it resolves to {} which {reason}; add the {service} aliases by hand",
            target.path.display()
        ));
        return Ok(StepRecord::new(Step::ShellAliases, StepOutcome::Skipped).with_detail(rc_display));
    }

    let block = AliasBlock::new(service);
    let existing = fs
        .read_optional(&target.path)
        .with_context(|| format!("reading {rc_display}"))?
        .unwrap_or_default();

    let Some(updated) = block.reconcile(&existing) else {
        reporter.success(&format!("aliases already present in {rc_display}"));
        return Ok(StepRecord::new(Step::ShellAliases, StepOutcome::Unchanged).with_detail(rc_display));
    };

    let outcome = match block.inspect(&existing) {
        ArtifactState::Missing => StepOutcome::Created,
        _ => StepOutcome::Updated,
    };
    fs.write_atomic(&target.path, &updated, RC_FILE_MODE)
        .with_context(|| format!("writing {rc_display}"))?;
    fs.chown(&target.path, account.uid, account.gid)?;

    reporter.success(&format!(
        "aliases {} in {rc_display}: {service}-start, {service}-stop, {service}-restart, {service}-status, {service}-logs",
        if outcome == StepOutcome::Created { "added" } else { "repaired" },
    ));
    Ok(StepRecord::new(Step::ShellAliases, outcome).with_detail(rc_display))
}

/// Why the installer must not write or chown `target` on behalf of
/// `account`, if it must not.
fn foreign_target(target: &ResolvedPath, home: &Path, account: &Account) -> Option<&'static str> {
    if !target.path.starts_with(home) {
        return Some("is outside the home directory");
    }
    match target.owner {
        Some(uid) if uid != account.uid => Some("belongs to another user"),
        _ => None,
    }
}
