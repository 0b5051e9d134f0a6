//! Preflight: resolve the target account and layout, and check preconditions.
//!
//! Nothing on the host is modified here. Every failure is an
//! operator-fixable [`PreflightError`].

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{HostIdentity, LocalFs};
use crate::domain::{Account, InstallLayout, InstallerConfig, InvokerEnv, PreflightError};

/// Account and layout resolved once for the rest of the run.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub account: Account,
    pub layout: InstallLayout,
}

/// Resolve the account the bot will run as.
///
/// # Errors
///
/// Returns [`PreflightError::NoUser`], [`PreflightError::UnknownUser`], or
/// [`PreflightError::HomeNotFound`].
pub fn resolve_account(
    host: &impl HostIdentity,
    env: &InvokerEnv,
    configured: Option<&str>,
) -> Result<Account> {
    let account = match env.target_user(configured) {
        Some(name) => host
            .lookup_user(name)?
            .ok_or_else(|| PreflightError::UnknownUser(name.to_string()))?,
        None => host.current_account()?.ok_or(PreflightError::NoUser)?,
    };
    if account.home.as_os_str().is_empty() || account.home == Path::new("/nonexistent") {
        return Err(PreflightError::HomeNotFound(account.name).into());
    }
    Ok(account)
}

/// Run all preflight checks in order: account/home, privileges, entry file,
/// bot config module.
///
/// # Errors
///
/// Returns the first failing check. Configuration errors surface first.
pub fn run(
    host: &impl HostIdentity,
    fs: &impl LocalFs,
    config: &InstallerConfig,
    cwd: &Path,
    env: &InvokerEnv,
) -> Result<Resolved> {
    config.validate()?;
    let account = resolve_account(host, env, config.user.as_deref())?;
    if !host.is_elevated() {
        return Err(PreflightError::NotElevated.into());
    }
    let layout = InstallLayout::resolve(config, cwd);
    if !fs.exists(&layout.entry) {
        return Err(PreflightError::EntryMissing(layout.entry).into());
    }
    if let Some(module) = layout.config_module.as_ref().filter(|m| !fs.exists(m)) {
        return Err(PreflightError::ConfigModuleMissing(module.clone()).into());
    }
    Ok(Resolved { account, layout })
}
