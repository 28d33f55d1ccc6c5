//! Domain types and validation for deployment configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.
//! Defaults reproduce the fixed FastNetMon test deployment; a YAML file may
//! override any subset of fields.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::DeployError;
use crate::domain::remote::{ConnectPolicy, INSTALL_COMMAND, PollPolicy};

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_TOKEN_FILE: &str = "/etc/do_api.key";
pub const DEFAULT_API_BASE_URL: &str = "https://api.digitalocean.com";
pub const DEFAULT_NAME_PREFIX: &str = "fastnetmon-test-deployment-";
pub const DEFAULT_REGION: &str = "fra1";
pub const DEFAULT_SIZE: &str = "2gb";
pub const DEFAULT_IMAGE: &str = "ubuntu-20-04-x64";
/// Fingerprint of the deploy key registered in the DigitalOcean account.
pub const DEFAULT_SSH_KEY_FINGERPRINT: &str = "99:ab:...:";
pub const DEFAULT_SSH_USER: &str = "root";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, optionally loaded from `~/.droplet-deploy/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DeployConfig {
    pub api: ApiConfig,
    pub droplet: DropletConfig,
    pub poll: PollConfig,
    pub ssh: SshConfig,
    pub install: InstallConfig,
}

/// Provider API access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// File holding the bearer token.
    pub token_file: PathBuf,
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// Create-request parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DropletConfig {
    pub name_prefix: String,
    pub region: String,
    pub size: String,
    pub image: String,
    /// SSH key fingerprints already registered with the provider.
    pub ssh_keys: Vec<String>,
}

impl Default for DropletConfig {
    fn default() -> Self {
        Self {
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            region: DEFAULT_REGION.to_string(),
            size: DEFAULT_SIZE.to_string(),
            image: DEFAULT_IMAGE.to_string(),
            ssh_keys: vec![DEFAULT_SSH_KEY_FINGERPRINT.to_string()],
        }
    }
}

/// Readiness polling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PollConfig {
    pub initial_delay_secs: u64,
    pub interval_secs: u64,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: 1,
            interval_secs: 3,
            // 10 minutes at the default interval
            max_attempts: 200,
        }
    }
}

/// Remote shell access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SshConfig {
    pub user: String,
    /// Private key path. `None` resolves to `~/.ssh/id_rsa`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<PathBuf>,
    pub attempt_limit: u32,
    pub retry_interval_secs: u64,
    /// TCP connect timeout for a single dial.
    pub connect_timeout_secs: u64,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_SSH_USER.to_string(),
            private_key: None,
            attempt_limit: 10,
            retry_interval_secs: 10,
            connect_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallConfig {
    pub command: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            command: INSTALL_COMMAND.to_string(),
        }
    }
}

impl DeployConfig {
    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            initial_delay: Duration::from_secs(self.poll.initial_delay_secs),
            interval: Duration::from_secs(self.poll.interval_secs),
            max_attempts: self.poll.max_attempts,
        }
    }

    #[must_use]
    pub fn connect_policy(&self) -> ConnectPolicy {
        ConnectPolicy {
            attempt_limit: self.ssh.attempt_limit,
            interval: Duration::from_secs(self.ssh.retry_interval_secs),
        }
    }

    /// Check the values a deployment cannot run without.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("droplet.region", &self.droplet.region),
            ("droplet.size", &self.droplet.size),
            ("droplet.image", &self.droplet.image),
            ("ssh.user", &self.ssh.user),
            ("install.command", &self.install.command),
            ("api.base_url", &self.api.base_url),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(DeployError::Config(format!("{key} must not be empty")).into());
            }
        }
        if self.droplet.ssh_keys.iter().all(|k| k.trim().is_empty()) {
            return Err(
                DeployError::Config("droplet.ssh_keys needs at least one fingerprint".into())
                    .into(),
            );
        }
        if self.poll.max_attempts == 0 {
            return Err(DeployError::Config("poll.max_attempts must be at least 1".into()).into());
        }
        if self.poll.interval_secs == 0 {
            return Err(DeployError::Config("poll.interval_secs must be at least 1".into()).into());
        }
        if self.ssh.attempt_limit == 0 {
            return Err(DeployError::Config("ssh.attempt_limit must be at least 1".into()).into());
        }
        if self.ssh.connect_timeout_secs == 0 {
            return Err(
                DeployError::Config("ssh.connect_timeout_secs must be at least 1".into()).into(),
            );
        }
        Ok(())
    }
}
