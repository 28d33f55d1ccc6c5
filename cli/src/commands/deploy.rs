//! Deploy command: wires the concrete adapters into the deploy service.

use std::time::Duration;

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::app::AppContext;
use crate::application::services::deploy::deploy;
use crate::infra::config::private_key_path;
use crate::infra::credentials::{load_private_key, read_api_token};
use crate::infra::digitalocean::DigitalOceanClient;
use crate::infra::ssh::RusshShell;
use crate::infra::stdio::process_stdio;
use crate::output::TerminalReporter;

/// Entry point for `droplet-deploy`.
///
/// Credentials are read before any network traffic, so a missing token or
/// key never leaves a droplet behind.
///
/// # Errors
///
/// Returns an error if a credential cannot be loaded or any deployment phase
/// fails.
pub async fn run(app: &AppContext) -> Result<()> {
    let config = &app.config;

    let token = read_api_token(&config.api.token_file)?;
    let key_path = private_key_path(config)?;
    let key = load_private_key(&key_path)?;
    debug!(path = %key_path.display(), "loaded private key");

    let provider = DigitalOceanClient::new(&config.api.base_url, token)?;
    let shell = RusshShell::new(
        &config.ssh.user,
        key,
        Duration::from_secs(config.ssh.connect_timeout_secs),
    );
    let mut rng = StdRng::from_os_rng();
    let reporter = TerminalReporter::new(&app.output);

    let droplet = deploy(
        &provider,
        &shell,
        config,
        &mut rng,
        process_stdio(),
        &app.cancel,
        &reporter,
    )
    .await?;

    app.output.success("deployment complete");
    app.output.kv("name   ", &droplet.name);
    app.output.kv("id     ", &droplet.id.to_string());
    app.output.kv("address", &droplet.address);
    Ok(())
}
