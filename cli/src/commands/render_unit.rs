//! `nearbot-provision render-unit`: print the unit `install` would write.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::preflight::resolve_account;
use crate::application::services::unit_file::desired_unit;
use crate::domain::{InstallLayout, InvokerEnv};
use crate::output::Renderer;

/// # Errors
///
/// Returns an error if the configuration or account cannot be resolved.
pub fn run(app: &AppContext) -> Result<()> {
    let config = app.config_store.load()?;
    config.validate()?;
    let env = InvokerEnv::capture();
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let account = resolve_account(&app.host, &env, config.user.as_deref())?;
    let layout = InstallLayout::resolve(&config, &cwd);
    let unit = desired_unit(&layout, &account);

    match app.renderer() {
        Renderer::Human(r) => r.render_unit(&unit),
        Renderer::Json(r) => r.render_unit(&layout.unit_path, &unit)?,
    }
    Ok(())
}
