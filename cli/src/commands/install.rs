//! `nearbot-provision install`: the default command.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::{install, preflight};
use crate::domain::InvokerEnv;
use crate::infra::provisioner::SystemProvisioner;
use crate::output::{Renderer, TerminalReporter};

/// Run preflight, then the full provisioning workflow.
///
/// # Errors
///
/// Returns the first preflight or step failure.
pub async fn run(app: &AppContext) -> Result<()> {
    let config = app.config_store.load()?;
    let env = InvokerEnv::capture();
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let resolved = preflight::run(&app.host, &app.fs, &config, &cwd, &env)?;

    if let Renderer::Human(r) = app.renderer() {
        r.render_layout(&resolved.layout, &resolved.account);
    }

    let provisioner =
        SystemProvisioner::default_runner(Duration::from_secs(config.command_timeout_secs));
    let reporter = TerminalReporter::new(&app.output);
    let report = install::provision(
        &provisioner,
        &app.fs,
        &reporter,
        &resolved,
        &config,
        env.shell.as_deref(),
    )
    .await?;
    drop(reporter);

    match app.renderer() {
        Renderer::Human(r) => r.render_install_report(&report, &resolved.layout),
        Renderer::Json(r) => r.render_install_report(&report)?,
    }
    Ok(())
}
