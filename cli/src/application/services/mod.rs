//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` and never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::domain::DeployError;

pub mod deploy;
pub mod provision;
pub mod remote_exec;

#[cfg(test)]
pub(crate) mod test_support;

/// Sleep for `duration` unless `cancel` fires first.
///
/// # Errors
///
/// Returns `DeployError::Cancelled` if the token is cancelled.
pub(crate) async fn pause(duration: Duration, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(DeployError::Cancelled.into()),
        () = tokio::time::sleep(duration) => Ok(()),
    }
}

/// Drive `fut` to completion unless `cancel` fires first.
///
/// # Errors
///
/// Returns `DeployError::Cancelled` if the token is cancelled.
pub(crate) async fn cancellable<F: Future>(fut: F, cancel: &CancellationToken) -> Result<F::Output> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(DeployError::Cancelled.into()),
        out = fut => Ok(out),
    }
}
