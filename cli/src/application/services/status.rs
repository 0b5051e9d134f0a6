//! Read-only inspection of everything `install` manages.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{HostIdentity, LocalFs, ServiceManager};
use crate::application::services::activation::poll_status;
use crate::application::services::preflight::resolve_account;
use crate::application::services::shell_integration::rc_path;
use crate::application::services::unit_file::unit_state;
use crate::domain::{AliasBlock, ArtifactState, InstallLayout, InstallerConfig, InvokerEnv, StatusReport};

/// Collect a [`StatusReport`] without modifying the host.
///
/// Needs no privileges: a service manager that cannot be reached reports the
/// state `unknown`, and so does an rc file the caller may not read.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the account cannot be
/// resolved, or the unit file exists but cannot be read.
pub async fn collect_status(
    sm: &impl ServiceManager,
    host: &impl HostIdentity,
    fs: &impl LocalFs,
    config: &InstallerConfig,
    cwd: &Path,
    env: &InvokerEnv,
) -> Result<StatusReport> {
    config.validate()?;
    let account = resolve_account(host, env, config.user.as_deref())?;
    let layout = InstallLayout::resolve(config, cwd);

    let rc_file = rc_path(&account, env.shell.as_deref());
    let aliases = match fs.read_optional(&rc_file) {
        Ok(Some(rc)) => AliasBlock::new(&layout.service_name).inspect(&rc),
        Ok(None) => ArtifactState::Missing,
        Err(_) => ArtifactState::Unknown,
    };

    let service_state = match poll_status(sm, &layout.unit_name()).await {
        Ok(status) => status.state,
        Err(_) => "unknown".to_string(),
    };

    Ok(StatusReport {
        service: layout.service_name.clone(),
        user: account.name.clone(),
        entry_present: fs.exists(&layout.entry),
        venv_present: fs.exists(&layout.venv_dir),
        manifest_present: fs.exists(&layout.manifest),
        config_module_present: layout.config_module.as_ref().map(|m| fs.exists(m)),
        unit_file: unit_state(fs, &layout, &account)?,
        env_file_present: fs.exists(&layout.env_path),
        rc_file,
        aliases,
        service_state,
    })
}
