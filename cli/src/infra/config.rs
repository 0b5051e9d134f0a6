//! Infrastructure implementation of the `ConfigStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::InstallerConfig;

/// Environment variable that overrides the configuration path.
pub const CONFIG_ENV: &str = "NEARBOT_PROVISION_CONFIG";

/// Configuration path used when neither `--config` nor the env var is set.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/nearbot-provision.yaml";

/// Production implementation of `ConfigStore` that reads a YAML file.
///
/// A missing file means "all defaults"; a present but malformed file is an
/// error.
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store reading from `path`, or from the env var / default location
    /// when `None`.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<InstallerConfig> {
        let path = self.path();
        if !path.exists() {
            return Ok(InstallerConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(InstallerConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        match std::env::var(CONFIG_ENV) {
            Ok(val) if !val.is_empty() => PathBuf::from(val),
            _ => PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }
}
