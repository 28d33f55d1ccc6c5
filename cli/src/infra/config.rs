//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::DeployConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DROPLET_DEPLOY_CONFIG";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
///
/// An explicit path (from `--config` or `DROPLET_DEPLOY_CONFIG`) must exist.
/// The default `~/.droplet-deploy/config.yaml` is optional.
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    fn explicit_path(&self) -> Option<PathBuf> {
        self.explicit
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<DeployConfig> {
        let path = self.path()?;
        if self.explicit_path().is_none() && !path.exists() {
            return Ok(DeployConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = self.explicit_path() {
            return Ok(path);
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".droplet-deploy").join("config.yaml"))
    }
}

/// SSH private key to authenticate with: the configured path or `~/.ssh/id_rsa`.
///
/// # Errors
///
/// Returns an error if no path is configured and the home directory cannot
/// be determined.
pub fn private_key_path(config: &DeployConfig) -> Result<PathBuf> {
    if let Some(path) = &config.ssh.private_key {
        return Ok(path.clone());
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".ssh").join("id_rsa"))
}
