//! `nearbot-provision status`: read-only host inspection.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::status::collect_status;
use crate::domain::InvokerEnv;
use crate::infra::command_runner::DEFAULT_CMD_TIMEOUT;
use crate::infra::provisioner::SystemProvisioner;
use crate::output::Renderer;

/// # Errors
///
/// Returns an error if the configuration or account cannot be resolved.
pub async fn run(app: &AppContext) -> Result<()> {
    let config = app.config_store.load()?;
    let env = InvokerEnv::capture();
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let sm = SystemProvisioner::default_runner(DEFAULT_CMD_TIMEOUT);
    let status = collect_status(&sm, &app.host, &app.fs, &config, &cwd, &env).await?;

    match app.renderer() {
        Renderer::Human(r) => r.render_status(&status),
        Renderer::Json(r) => r.render_status(&status)?,
    }
    Ok(())
}
