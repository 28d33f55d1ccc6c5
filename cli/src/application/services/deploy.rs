//! End-to-end deployment: name → provision → remote install.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use rand::Rng;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::provision::{ProvisionedDroplet, provision, still_running};
use super::remote_exec::{ExecRequest, execute};
use crate::application::ports::{ComputeProvider, LocalStdio, ProgressReporter, RemoteShell};
use crate::domain::naming::droplet_name;
use crate::domain::{DeployConfig, DropletSpec, PtySpec};

/// Build the create request for this run from `config`, naming the droplet
/// with `rng`.
pub fn droplet_spec<R: Rng + ?Sized>(config: &DeployConfig, rng: &mut R) -> DropletSpec {
    DropletSpec {
        name: droplet_name(&config.droplet.name_prefix, rng),
        region: config.droplet.region.clone(),
        size: config.droplet.size.clone(),
        image: config.droplet.image.clone(),
        ssh_keys: config.droplet.ssh_keys.clone(),
    }
}

/// Provision a droplet and run the install command on it.
///
/// The droplet is left running on every path, including failure.
///
/// # Errors
///
/// Propagates the first `DeployError` from either phase.
pub async fn deploy<P, S, R, I, O, E>(
    provider: &P,
    shell: &S,
    config: &DeployConfig,
    rng: &mut R,
    stdio: LocalStdio<I, O, E>,
    cancel: &CancellationToken,
    reporter: &impl ProgressReporter,
) -> Result<ProvisionedDroplet>
where
    P: ComputeProvider,
    S: RemoteShell,
    R: Rng + ?Sized,
    I: AsyncRead + Unpin + Send + 'static,
    O: AsyncWrite + Unpin + Send + 'static,
    E: AsyncWrite + Unpin + Send + 'static,
{
    let spec = droplet_spec(config, rng);
    let droplet = provision(provider, &spec, config.poll_policy(), cancel, reporter).await?;

    let pty = PtySpec::default();
    let request = ExecRequest {
        command: &config.install.command,
        pty: &pty,
        policy: config.connect_policy(),
    };
    execute(shell, &droplet.address, &request, stdio, cancel, reporter)
        .await
        .with_context(|| still_running(droplet.id, &droplet.name))?;

    info!(id = droplet.id, address = %droplet.address, "deployment finished");
    Ok(droplet)
}
