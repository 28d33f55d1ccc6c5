//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::app::{AppContext, AppFlags, ConfigOverrides, OutputFlags};
use crate::commands;

/// Provision a DigitalOcean droplet and run the FastNetMon installer on it
#[derive(Parser)]
#[command(name = "droplet-deploy", version)]
pub struct Cli {
    /// Config file (default: ~/.droplet-deploy/config.yaml)
    #[arg(long, env = "DROPLET_DEPLOY_CONFIG")]
    pub config: Option<PathBuf>,

    /// File holding the DigitalOcean API token (default: /etc/do_api.key)
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// SSH private key used to log in (default: ~/.ssh/id_rsa)
    #[arg(long)]
    pub ssh_key: Option<PathBuf>,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log debug detail to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Default log level for these flags. `RUST_LOG` takes precedence.
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }

    /// Execute the deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the deployment fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            config,
            token_file,
            ssh_key,
            quiet,
            no_color,
            verbose: _,
        } = self;
        let app = AppContext::new(AppFlags {
            output: OutputFlags { no_color, quiet },
            overrides: ConfigOverrides {
                config,
                token_file,
                ssh_key,
            },
        })?;
        app.watch_interrupt();
        commands::deploy::run(&app).await
    }
}
