//! Application context: unified state passed to the deploy command.
//!
//! Built once in `Cli::run()`: output styling, the resolved configuration,
//! and the cancellation token tripped by Ctrl-C.

use std::path::PathBuf;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::application::ports::ConfigStore;
use crate::domain::DeployConfig;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Command-line overrides applied on top of the config file.
#[derive(Default)]
pub struct ConfigOverrides {
    /// Explicit config file (`--config`).
    pub config: Option<PathBuf>,
    /// API token file (`--token-file`).
    pub token_file: Option<PathBuf>,
    /// SSH private key (`--ssh-key`).
    pub ssh_key: Option<PathBuf>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub overrides: ConfigOverrides,
}

/// Unified application context passed to command handlers.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Validated configuration with CLI overrides applied.
    pub config: DeployConfig,
    /// Cancelled on Ctrl-C.
    pub cancel: CancellationToken,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if
    /// the resulting configuration fails validation.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let store = YamlConfigStore::new(flags.overrides.config.clone());
        let config = resolve_config(&store, flags.overrides)?;
        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// Cancel `self.cancel` when the process receives Ctrl-C.
    ///
    /// Must be called from within a tokio runtime.
    pub fn watch_interrupt(&self) {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    warn!("interrupt received, cancelling");
                    cancel.cancel();
                }
                Err(e) => warn!(error = %e, "cannot listen for Ctrl-C"),
            }
        });
    }
}

/// Load the config from `store`, apply CLI overrides, and validate.
///
/// # Errors
///
/// Returns an error if loading fails or validation rejects a field.
pub fn resolve_config(store: &impl ConfigStore, overrides: ConfigOverrides) -> Result<DeployConfig> {
    let mut config = store.load()?;
    if let Some(path) = overrides.token_file {
        config.api.token_file = path;
    }
    if let Some(path) = overrides.ssh_key {
        config.ssh.private_key = Some(path);
    }
    config.validate()?;
    Ok(config)
}
