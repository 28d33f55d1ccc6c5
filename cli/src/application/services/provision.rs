//! Droplet provisioning: create request, then poll until the droplet unlocks.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{cancellable, pause};
use crate::application::ports::{ComputeProvider, ProgressReporter};
use crate::domain::{DeployError, DropletLifecycle, DropletSpec, PollPolicy};

/// A droplet that is unlocked and has a reachable address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedDroplet {
    pub id: u64,
    pub name: String,
    pub address: String,
}

/// Create a droplet and wait until it is ready.
///
/// The create request is not retried. After the acknowledgment the service
/// waits `policy.initial_delay` and then polls with [`wait_until_ready`].
///
/// # Errors
///
/// Returns `DeployError::ProviderRequest` if the provider rejects a call,
/// `DeployError::Timeout` if the droplet stays locked, `DeployError::NoIpv4Address`
/// if it unlocks without an address, or `DeployError::Cancelled`.
pub async fn provision(
    provider: &impl ComputeProvider,
    spec: &DropletSpec,
    policy: PollPolicy,
    cancel: &CancellationToken,
    reporter: &impl ProgressReporter,
) -> Result<ProvisionedDroplet> {
    reporter.step(&format!("creating droplet {}...", spec.name));
    let created = cancellable(provider.create_droplet(spec), cancel)
        .await?
        .context("creating droplet")?;
    info!(id = created.id, name = %spec.name, region = %spec.region, "droplet created");
    reporter.success(&format!("droplet {} created", created.id));

    let address = async {
        pause(policy.initial_delay, cancel).await?;
        reporter.step("waiting for droplet to boot...");
        wait_until_ready(provider, created.id, policy, cancel).await
    }
    .await
    .with_context(|| still_running(created.id, &spec.name))?;
    reporter.success(&format!("droplet ready at {address}"));

    Ok(ProvisionedDroplet {
        id: created.id,
        name: spec.name.clone(),
        address,
    })
}

/// Error context naming a droplet that outlives a failed deployment.
#[must_use]
pub fn still_running(id: u64, name: &str) -> String {
    format!("droplet {name} (id {id}) is still running")
}

/// Poll `id` until the provider reports it unlocked, returning its first IPv4.
///
/// Issues exactly one status call per elapsed `policy.interval`; there is no
/// sleep after the final attempt.
///
/// # Errors
///
/// See [`provision`].
pub async fn wait_until_ready(
    provider: &impl ComputeProvider,
    id: u64,
    policy: PollPolicy,
    cancel: &CancellationToken,
) -> Result<String> {
    for attempt in 1..=policy.max_attempts {
        let droplet = cancellable(provider.get_droplet(id), cancel)
            .await?
            .with_context(|| format!("reading status of droplet {id}"))?;

        match droplet.lifecycle() {
            DropletLifecycle::Ready => {
                let address = droplet.first_ipv4()?.to_string();
                info!(id, %address, attempt, "droplet unlocked");
                return Ok(address);
            }
            DropletLifecycle::Provisioning => {
                debug!(id, attempt, status = %droplet.status, "droplet locked, waiting");
                if attempt < policy.max_attempts {
                    pause(policy.interval, cancel).await?;
                }
            }
        }
    }
    Err(DeployError::Timeout {
        id,
        attempts: policy.max_attempts,
    }
    .into())
}
